//! Per-worker search loop

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::One;
use tracing::{debug, trace};

use super::{
    branch_size, Fragment, FragmentReport, Outcome, SearchCounters, SearchCursor, TraversalMode,
    Visit,
};
use crate::codec::OrdinalCodec;
use crate::packing::{Knapsack, PackingVector};
use crate::TreeError;

/// Walks one fragment of the packing tree.
///
/// Borrows the shared codec and instance; all mutable state (ordinal,
/// cursor, counters) lives on the stack of [`SearchDriver::run`], so one
/// driver can serve any number of fragments concurrently.
#[derive(Debug, Clone, Copy)]
pub struct SearchDriver<'a> {
    codec: &'a OrdinalCodec,
    knapsack: &'a Knapsack,
    mode: TraversalMode,
    collect_solutions: bool,
}

impl<'a> SearchDriver<'a> {
    /// Create a driver; the instance must have as many items as the codec's task size.
    pub fn new(
        codec: &'a OrdinalCodec,
        knapsack: &'a Knapsack,
        mode: TraversalMode,
    ) -> Result<Self, TreeError> {
        if knapsack.task_size() != codec.task_size() {
            return Err(TreeError::WeightCount {
                expected: codec.task_size(),
                found: knapsack.task_size(),
            });
        }
        Ok(Self {
            codec,
            knapsack,
            mode,
            collect_solutions: false,
        })
    }

    /// Keep every matching packing in the report.
    pub fn with_solutions(mut self, enabled: bool) -> Self {
        self.collect_solutions = enabled;
        self
    }

    /// Traversal mode in use.
    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// Search `fragment` to completion.
    pub fn run(&self, fragment: &Fragment) -> Result<FragmentReport, TreeError> {
        self.run_observed(fragment, |_| {})
    }

    /// Search `fragment`, handing every visited node to `observer` in order.
    pub fn run_observed<F>(
        &self,
        fragment: &Fragment,
        mut observer: F,
    ) -> Result<FragmentReport, TreeError>
    where
        F: FnMut(&Visit<'_>),
    {
        if &fragment.end >= self.codec.leaf_count() {
            return Err(TreeError::OrdinalOutOfRange {
                ordinal: fragment.end.clone(),
                task_size: self.codec.task_size(),
            });
        }

        debug!(fragment = %fragment, mode = ?self.mode, "fragment search started");

        let mut tally = Tally::new(self.collect_solutions);
        match self.mode {
            TraversalMode::Baseline => self.run_baseline(fragment, &mut tally, &mut observer)?,
            TraversalMode::Cursor => self.run_cursor(fragment, &mut tally, &mut observer)?,
        }

        debug!(
            fragment = %fragment,
            nodes = tally.counters.nodes,
            matches = tally.counters.matches,
            pruned_branches = tally.counters.pruned_branches,
            "fragment search finished"
        );

        Ok(FragmentReport {
            fragment: fragment.clone(),
            counters: tally.counters,
            solutions: tally.solutions,
        })
    }

    fn run_baseline<F>(
        &self,
        fragment: &Fragment,
        tally: &mut Tally,
        observer: &mut F,
    ) -> Result<(), TreeError>
    where
        F: FnMut(&Visit<'_>),
    {
        let items = self.knapsack.weights();
        let mut current = fragment.start.clone();

        while current <= fragment.end {
            // re-derive the packing from its number every time
            let vector = self.codec.decode(&current)?;
            let weight = vector.weight(items);
            let outcome = self.classify(&weight);

            observer(&Visit {
                ordinal: &current,
                vector: &vector,
                weight: &weight,
                outcome,
            });

            let step = tally.record(outcome, &vector);
            current += step;
        }
        Ok(())
    }

    fn run_cursor<F>(
        &self,
        fragment: &Fragment,
        tally: &mut Tally,
        observer: &mut F,
    ) -> Result<(), TreeError>
    where
        F: FnMut(&Visit<'_>),
    {
        let mut current = fragment.start.clone();
        let mut cursor = SearchCursor::at_ordinal(self.codec, &current, self.knapsack)?;

        while current <= fragment.end {
            let outcome = self.classify(cursor.weight());

            observer(&Visit {
                ordinal: &current,
                vector: cursor.vector(),
                weight: cursor.weight(),
                outcome,
            });

            let step = tally.record(outcome, cursor.vector());
            match (outcome, cursor.leaf_bit_set()) {
                (_, true) => cursor.step_back(),
                (Outcome::Light, false) => cursor.step_forward(),
                (Outcome::Heavy | Outcome::Match, false) => cursor.step_side(),
            };
            current += step;
        }
        Ok(())
    }

    fn classify(&self, weight: &BigUint) -> Outcome {
        match weight.cmp(self.knapsack.target()) {
            Ordering::Less => Outcome::Light,
            Ordering::Greater => Outcome::Heavy,
            Ordering::Equal => Outcome::Match,
        }
    }
}

/// Counters plus collected solutions for one fragment.
#[derive(Debug)]
struct Tally {
    counters: SearchCounters,
    solutions: Vec<PackingVector>,
    collect: bool,
}

impl Tally {
    fn new(collect: bool) -> Self {
        Self {
            counters: SearchCounters::default(),
            solutions: Vec::new(),
            collect,
        }
    }

    /// Account for one node and return how far the ordinal advances.
    fn record(&mut self, outcome: Outcome, vector: &PackingVector) -> BigUint {
        self.counters.nodes += 1;
        match outcome {
            Outcome::Light => BigUint::one(),
            Outcome::Heavy | Outcome::Match => {
                if outcome == Outcome::Match {
                    self.counters.matches += 1;
                    if self.collect {
                        self.solutions.push(vector.clone());
                    }
                }
                let skip = branch_size(vector);
                trace!(vector = %vector, skip = %skip, ?outcome, "pruned branch");
                self.counters.pruned_branches += 1;
                self.counters.pruned_leaves += &skip - 1u32;
                skip
            }
        }
    }
}
