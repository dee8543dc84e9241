//! Load balancing
//!
//! The ordinal space [0, 2^n) is cut into P contiguous fragments of
//! `2^n / P` ordinals each. When P does not divide 2^n the last fragment
//! absorbs the remainder, so the fragments always cover every ordinal
//! exactly once.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::domain::leaf_count;
use crate::TreeError;

/// A worker's inclusive ordinal range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment {
    /// Worker rank, 0-based.
    pub index: usize,
    /// First ordinal to check.
    pub start: BigUint,
    /// Last ordinal to check (inclusive).
    pub end: BigUint,
}

impl Fragment {
    /// Number of ordinals covered.
    pub fn len(&self) -> BigUint {
        if self.is_empty() {
            return BigUint::zero();
        }
        &self.end - &self.start + 1u32
    }

    /// Whether the fragment covers no ordinals (`end < start`).
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `ordinal` falls inside the fragment.
    pub fn contains(&self, ordinal: &BigUint) -> bool {
        &self.start <= ordinal && ordinal <= &self.end
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}, {}]", self.index, self.start, self.end)
    }
}

/// Split `[0, 2^task_size)` among `workers`.
pub fn partition(task_size: usize, workers: usize) -> Result<Vec<Fragment>, TreeError> {
    let total = leaf_count(task_size);
    let fits = BigUint::from(workers) <= total;
    if workers == 0 || !fits {
        return Err(TreeError::InvalidWorkerCount {
            workers,
            task_size,
        });
    }

    let size = &total / BigUint::from(workers);
    let last = workers - 1;
    let fragments = (0..workers)
        .map(|index| {
            let start = &size * BigUint::from(index);
            let end = if index == last {
                &total - BigUint::one()
            } else {
                &start + &size - BigUint::one()
            };
            Fragment { index, start, end }
        })
        .collect();
    Ok(fragments)
}

/// Remainder ordinals absorbed by the last fragment.
pub fn remainder(task_size: usize, workers: usize) -> usize {
    if workers == 0 {
        return 0;
    }
    (leaf_count(task_size) % BigUint::from(workers))
        .to_usize()
        .unwrap_or(0)
}
