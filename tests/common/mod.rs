#![allow(dead_code)]

use knapsack_tree::{Knapsack, PackingVector};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Every packing of `n` items in depth-first order, built by explicit
/// recursion over the subset tree.
pub fn preorder(n: usize) -> Vec<PackingVector> {
    fn visit(bits: &mut Vec<bool>, from: usize, out: &mut Vec<PackingVector>) {
        out.push(PackingVector::from_bools(bits));
        for i in from..bits.len() {
            bits[i] = true;
            visit(bits, i + 1, out);
            bits[i] = false;
        }
    }

    let mut out = Vec::with_capacity(1 << n);
    visit(&mut vec![false; n], 0, &mut out);
    out
}

/// Number of packings whose weight equals the target, by enumeration.
pub fn count_matches(knapsack: &Knapsack) -> u64 {
    let n = knapsack.task_size();
    (0u64..1 << n)
        .filter(|mask| {
            let bits: Vec<bool> = (0..n).map(|i| mask >> i & 1 == 1).collect();
            PackingVector::from_bools(&bits).weight(knapsack.weights()) == *knapsack.target()
        })
        .count() as u64
}
