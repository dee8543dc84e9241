//! # Knapsack Tree Search via Octal Linearization
//!
//! Exact branch-and-bound search for subset-sum packings over the complete
//! packing tree of n items, without ever materializing the tree.
//!
//! ## Core Algorithm
//!
//! 1. **Octal collapse**: the packing tree for n items is made of 8-node base
//!    subtrees; collapsing them yields the tree for n - 3
//! 2. **Domain size cache**: starting ordinal of every base subtree at every
//!    collapse level, computed once per task size
//! 3. **Linearization**: ordinal <-> literal string <-> packing vector, a
//!    bijection onto `[0, 2^n)` in depth-first order
//! 4. **Branch skipping**: a pruned node's subtree is `2^z` consecutive
//!    ordinals, so pruning is a single addition
//!
//! Result: the ordinal space splits into contiguous fragments that workers
//! search independently.
//!
//! ## Usage Example
//!
//! ```
//! use knapsack_tree::{Knapsack, SearchConfig, TraversalMode, TreeSearch};
//!
//! let knapsack = Knapsack::from_u64(&[3, 5, 6, 8, 9, 14], 14)?;
//! let config = SearchConfig::new(4).with_mode(TraversalMode::Cursor);
//! let report = TreeSearch::new(knapsack, config)?.run()?;
//! assert_eq!(report.totals.matches, 4);
//! # Ok::<(), knapsack_tree::TreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod domain; // Octal domains and the domain size cache
pub mod codec; // Ordinal <-> packing vector linearization
pub mod packing; // Packing vectors and knapsack instances
pub mod search; // Branch sizes, cursor, partitioning, driver

// Re-exports for convenience
pub use codec::{LiteralString, OrdinalCodec};
pub use domain::{Domain, DomainSizeCache, ReductionRate};
pub use packing::{Knapsack, PackingVector};
pub use search::{
    branch_size, partition, Fragment, FragmentReport, Outcome, SearchCounters, SearchCursor,
    SearchDriver, TraversalMode, Visit,
};

use num_bigint::BigUint;
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

/// Errors raised by the linearization engine and the search driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Task size too small for the octal decomposition
    #[error("Unable to linearize packing trees for task size {task_size} (need at least 3)")]
    InvalidSize {
        /// Requested task size
        task_size: usize,
    },

    /// A literal string holds a label that cannot appear at its level
    #[error("Unmapped literal {label} at collapse level {level}")]
    UnmappedLiteral {
        /// Collapse level of the offending label
        level: usize,
        /// The label itself
        label: u8,
    },

    /// Ordinal outside `[0, 2^n)`
    #[error("Ordinal {ordinal} out of range for task size {task_size}")]
    OrdinalOutOfRange {
        /// Offending ordinal
        ordinal: BigUint,
        /// Task size in use
        task_size: usize,
    },

    /// Packing vector length differs from the task size
    #[error("Packing vector has {found} items, expected {expected}")]
    VectorLength {
        /// Task size
        expected: usize,
        /// Actual length
        found: usize,
    },

    /// Literal string level count differs from the task size's
    #[error("Literal string has {found} levels, expected {expected}")]
    LiteralLength {
        /// Levels for the task size
        expected: usize,
        /// Actual level count
        found: usize,
    },

    /// Instance weights do not match the task size
    #[error("Knapsack has {found} weights, expected {expected}")]
    WeightCount {
        /// Task size
        expected: usize,
        /// Number of weights supplied
        found: usize,
    },

    /// Worker count is zero or exceeds the number of packings
    #[error("Invalid worker count {workers} for task size {task_size}")]
    InvalidWorkerCount {
        /// Requested workers
        workers: usize,
        /// Task size
        task_size: usize,
    },

    /// Packing vector text is not made of `0` and `1`
    #[error("Malformed packing vector: {0:?}")]
    MalformedVector(String),
}

/// Configuration parameters for a search
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Number of fragments (workers) P
    pub workers: usize,

    /// Baseline decoding or incremental cursor
    pub mode: TraversalMode,

    /// Run fragments on the rayon pool instead of one after another
    pub parallel: bool,

    /// Keep matching packings in the report
    pub collect_solutions: bool,
}

impl SearchConfig {
    /// Configuration with `workers` fragments and default settings otherwise.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    /// Select the traversal mode.
    pub fn with_mode(mut self, mode: TraversalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable parallel fragment execution.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Enable solution collection.
    pub fn with_collect_solutions(mut self, enabled: bool) -> Self {
        self.collect_solutions = enabled;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            mode: TraversalMode::Cursor,
            parallel: true,
            collect_solutions: false,
        }
    }
}

/// Result of a complete search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Per-fragment reports, ordered by fragment index
    pub fragments: Vec<FragmentReport>,

    /// Counters summed over all fragments
    pub totals: SearchCounters,
}

impl SearchReport {
    /// All collected solutions in visitation order.
    pub fn solutions(&self) -> impl Iterator<Item = &PackingVector> {
        self.fragments.iter().flat_map(|report| report.solutions.iter())
    }
}

/// Search orchestrator
///
/// Builds the domain size cache once, before any worker starts, and shares
/// it read-only with every fragment.
#[derive(Debug)]
pub struct TreeSearch {
    knapsack: Knapsack,
    config: SearchConfig,
    codec: OrdinalCodec,
}

impl TreeSearch {
    /// Prepare a search; fails for instances with fewer than 3 items.
    pub fn new(knapsack: Knapsack, config: SearchConfig) -> Result<Self, TreeError> {
        let codec = OrdinalCodec::new(knapsack.task_size())?;
        Ok(Self {
            knapsack,
            config,
            codec,
        })
    }

    /// The shared codec.
    pub fn codec(&self) -> &OrdinalCodec {
        &self.codec
    }

    /// The instance being searched.
    pub fn knapsack(&self) -> &Knapsack {
        &self.knapsack
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run every fragment to completion and aggregate the counters.
    ///
    /// The first fragment error aborts the search.
    pub fn run(&self) -> Result<SearchReport, TreeError> {
        let fragments = partition(self.knapsack.task_size(), self.config.workers)?;
        let driver = SearchDriver::new(&self.codec, &self.knapsack, self.config.mode)?
            .with_solutions(self.config.collect_solutions);

        let fragments: Vec<FragmentReport> = if self.config.parallel {
            fragments
                .par_iter()
                .map(|fragment| driver.run(fragment))
                .collect::<Result<_, _>>()?
        } else {
            fragments
                .iter()
                .map(|fragment| driver.run(fragment))
                .collect::<Result<_, _>>()?
        };

        let mut totals = SearchCounters::default();
        for report in &fragments {
            totals += &report.counters;
        }

        info!(
            task_size = self.knapsack.task_size(),
            workers = self.config.workers,
            mode = ?self.config.mode,
            nodes = totals.nodes,
            matches = totals.matches,
            pruned_branches = totals.pruned_branches,
            "tree search finished"
        );

        Ok(SearchReport { fragments, totals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.workers, 1);
        assert_eq!(config.mode, TraversalMode::Cursor);
        assert!(config.parallel);
        assert!(!config.collect_solutions);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let knapsack = Knapsack::from_u64(&[2, 3, 5, 7, 11, 13, 17, 19], 30).unwrap();
        let sequential = TreeSearch::new(
            knapsack.clone(),
            SearchConfig::new(8).with_parallel(false).with_collect_solutions(true),
        )
        .unwrap()
        .run()
        .unwrap();
        let parallel = TreeSearch::new(
            knapsack,
            SearchConfig::new(8).with_parallel(true).with_collect_solutions(true),
        )
        .unwrap()
        .run()
        .unwrap();

        assert_eq!(sequential.totals, parallel.totals);
        let a: Vec<_> = sequential.solutions().collect();
        let b: Vec<_> = parallel.solutions().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_too_many_workers() {
        let knapsack = Knapsack::from_u64(&[1, 2, 3], 3).unwrap();
        let search = TreeSearch::new(knapsack, SearchConfig::new(9)).unwrap();
        assert!(matches!(
            search.run(),
            Err(TreeError::InvalidWorkerCount { workers: 9, task_size: 3 })
        ));
    }
}
