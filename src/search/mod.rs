//! Branch-and-bound search over the linearized packing tree
//!
//! Each worker owns a contiguous fragment of ordinals and walks it in
//! depth-first order. Light packings advance by one ordinal; heavy and
//! matching packings prune their whole subtree by advancing the ordinal by
//! the branch size.

mod branch;
mod cursor;
mod driver;
mod partition;

pub use branch::{branch_exponent, branch_size};
pub use cursor::SearchCursor;
pub use driver::SearchDriver;
pub use partition::{partition, remainder, Fragment};

use std::ops::AddAssign;

use num_bigint::BigUint;

use crate::packing::PackingVector;

/// How the driver obtains each packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraversalMode {
    /// Decode every ordinal and weigh it from scratch.
    Baseline,
    /// Decode once, then follow the tree with a [`SearchCursor`].
    #[default]
    Cursor,
}

/// Result of comparing a packing's weight with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Below target: keep descending.
    Light,
    /// Above target: prune the subtree.
    Heavy,
    /// Exactly the target: record, then prune.
    Match,
}

/// One node as seen by the driver.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Ordinal of the node.
    pub ordinal: &'a BigUint,
    /// Packing at the node.
    pub vector: &'a PackingVector,
    /// Its weight.
    pub weight: &'a BigUint,
    /// Comparison with the target.
    pub outcome: Outcome,
}

/// Running counters of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchCounters {
    /// Packings examined.
    pub nodes: u64,
    /// Packings hitting the target exactly.
    pub matches: u64,
    /// Heavy or matching nodes whose subtree was skipped.
    pub pruned_branches: u64,
    /// Ordinals skipped without being examined.
    pub pruned_leaves: BigUint,
}

impl AddAssign<&SearchCounters> for SearchCounters {
    fn add_assign(&mut self, other: &SearchCounters) {
        self.nodes += other.nodes;
        self.matches += other.matches;
        self.pruned_branches += other.pruned_branches;
        self.pruned_leaves += &other.pruned_leaves;
    }
}

/// What one worker found in its fragment.
#[derive(Debug, Clone)]
pub struct FragmentReport {
    /// The fragment searched.
    pub fragment: Fragment,
    /// Counters for the fragment.
    pub counters: SearchCounters,
    /// Matching packings, when collection is enabled.
    pub solutions: Vec<PackingVector>,
}
