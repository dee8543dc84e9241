use knapsack_tree::{partition, Fragment, TreeError};
use num_bigint::BigUint;
use proptest::prelude::*;

fn assert_tiles(fragments: &[Fragment], task_size: usize) {
    let mut next = BigUint::default();
    for (index, fragment) in fragments.iter().enumerate() {
        assert_eq!(fragment.index, index);
        assert_eq!(fragment.start, next, "gap or overlap before {}", fragment);
        assert!(fragment.end >= fragment.start);
        next = &fragment.end + 1u32;
    }
    assert_eq!(next, BigUint::from(1u32) << task_size);
}

#[test]
fn single_worker_takes_everything() {
    let fragments = partition(10, 1).expect("valid partition");
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].len(), BigUint::from(1024u32));
}

#[test]
fn one_ordinal_per_worker() {
    let fragments = partition(3, 8).expect("valid partition");
    assert!(fragments.iter().all(|f| f.len() == BigUint::from(1u32)));
    assert_tiles(&fragments, 3);
}

#[test]
fn large_task_sizes_split_exactly() {
    let fragments = partition(200, 12).expect("valid partition");
    assert_tiles(&fragments, 200);
}

#[test]
fn rejects_invalid_worker_counts() {
    assert_eq!(
        partition(4, 0),
        Err(TreeError::InvalidWorkerCount {
            workers: 0,
            task_size: 4
        })
    );
    assert!(partition(4, 17).is_err());
}

proptest! {
    #[test]
    fn fragments_tile_the_ordinal_space(task_size in 3usize..40, workers in 1usize..500) {
        prop_assume!((workers as u128) <= 1u128 << task_size);
        let fragments = partition(task_size, workers).expect("valid partition");
        prop_assert_eq!(fragments.len(), workers);
        assert_tiles(&fragments, task_size);
    }
}
