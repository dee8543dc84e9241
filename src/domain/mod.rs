//! Octal domains of the packing tree
//!
//! The packing tree for task size n is self-similar: collapsing every base
//! subtree of 8 nodes (task size 3) into a single node yields the packing
//! tree for n - 3. Repeating the collapse gives CollapseLevels
//! 0..=MaxDepth(n), where level 0 covers the three least significant
//! variables and level MaxDepth covers the most significant ones.
//!
//! Domains are visited depth-first in the order 0, 1, 3, 7, 5, 2, 6, 4.

mod cache;

pub use cache::{DomainSizeCache, LevelOffsets, Offset, OFFSETS_PER_LEVEL};

use num_bigint::BigUint;
use num_traits::One;
use std::fmt;

/// Smallest task size with a valid recursive decomposition.
pub const MIN_TASK_SIZE: usize = 3;

/// One of the eight base subtrees at a collapse level.
///
/// The discriminant is the domain label: bit 0 is the most significant
/// variable of the group, bit 2 the least significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Domain {
    /// `000`
    Zero = 0,
    /// `100`
    One = 1,
    /// `110`
    Three = 3,
    /// `111`
    Seven = 7,
    /// `101`
    Five = 5,
    /// `010`
    Two = 2,
    /// `011`
    Six = 6,
    /// `001`
    Four = 4,
}

/// Depth-first visitation order of the domains.
pub const VISITATION_ORDER: [Domain; 8] = [
    Domain::Zero,
    Domain::One,
    Domain::Three,
    Domain::Seven,
    Domain::Five,
    Domain::Two,
    Domain::Six,
    Domain::Four,
];

impl Domain {
    /// Parse a numeric label (0..8).
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Domain::Zero),
            1 => Some(Domain::One),
            3 => Some(Domain::Three),
            7 => Some(Domain::Seven),
            5 => Some(Domain::Five),
            2 => Some(Domain::Two),
            6 => Some(Domain::Six),
            4 => Some(Domain::Four),
            _ => None,
        }
    }

    /// Numeric label.
    #[inline]
    pub fn label(self) -> u8 {
        self as u8
    }

    /// Fixed 3-bit pattern, most significant variable first.
    #[inline]
    pub fn pattern(self) -> [bool; 3] {
        let label = self.label();
        [label & 1 != 0, label & 2 != 0, label & 4 != 0]
    }

    /// Build a domain from a 3-bit pattern, most significant variable first.
    #[inline]
    pub fn from_pattern(pattern: [bool; 3]) -> Self {
        match (pattern[0] as u8) | (pattern[1] as u8) << 1 | (pattern[2] as u8) << 2 {
            0 => Domain::Zero,
            1 => Domain::One,
            2 => Domain::Two,
            3 => Domain::Three,
            4 => Domain::Four,
            5 => Domain::Five,
            6 => Domain::Six,
            _ => Domain::Seven,
        }
    }

    /// Position in [`VISITATION_ORDER`].
    pub fn visitation_rank(self) -> usize {
        match self {
            Domain::Zero => 0,
            Domain::One => 1,
            Domain::Three => 2,
            Domain::Seven => 3,
            Domain::Five => 4,
            Domain::Two => 5,
            Domain::Six => 6,
            Domain::Four => 7,
        }
    }

    /// Whether the domain exists at an outermost level reduced by `rate`.
    ///
    /// Rate 1 keeps {0, 2, 6, 4}, rate 2 keeps {0, 4}: the leading `rate`
    /// pattern bits must be clear.
    pub fn present_under(self, rate: ReductionRate) -> bool {
        let pattern = self.pattern();
        pattern[..rate.missing_bits()].iter().all(|bit| !bit)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How many variables the outermost collapse level lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReductionRate {
    /// All 8 outermost domains present (n divisible by 3).
    Full,
    /// Only 4 outermost domains present (n mod 3 = 2).
    Half,
    /// Only 2 outermost domains present (n mod 3 = 1).
    Quarter,
}

impl ReductionRate {
    /// Reduction rate for a task size: `(3 - n mod 3) mod 3`.
    pub fn for_task_size(task_size: usize) -> Self {
        match (3 - task_size % 3) % 3 {
            0 => ReductionRate::Full,
            1 => ReductionRate::Half,
            _ => ReductionRate::Quarter,
        }
    }

    /// Numeric rate (0, 1 or 2).
    #[inline]
    pub fn value(self) -> usize {
        match self {
            ReductionRate::Full => 0,
            ReductionRate::Half => 1,
            ReductionRate::Quarter => 2,
        }
    }

    /// Leading pattern bits absent at the outermost level.
    #[inline]
    pub fn missing_bits(self) -> usize {
        self.value()
    }

    /// Pattern bits actually emitted at the outermost level.
    #[inline]
    pub fn emitted_bits(self) -> usize {
        3 - self.value()
    }
}

/// MaxDepth(n) = (n - 1) / 3
#[inline]
pub fn max_depth(task_size: usize) -> usize {
    task_size.saturating_sub(1) / 3
}

/// Number of collapse levels, MaxDepth(n) + 1.
#[inline]
pub fn level_count(task_size: usize) -> usize {
    max_depth(task_size) + 1
}

/// Packings held by one multinode after `level` collapses: `2^(3 level + 1) - 1`.
pub fn domain_size(level: usize) -> BigUint {
    (BigUint::one() << (3 * level + 1)) - BigUint::one()
}

/// Total number of packings, `2^n`.
pub fn leaf_count(task_size: usize) -> BigUint {
    BigUint::one() << task_size
}
