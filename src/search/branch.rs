//! Branch sizes
//!
//! The subtree rooted at a packing spans every ordinal that shares its open
//! suffix: `2^z` leaves, where z counts the zeros after the deepest packed
//! item. Skipping a pruned node is a single addition.

use num_bigint::BigUint;
use num_traits::One;

use crate::packing::PackingVector;

/// Zeros after the deepest set bit (n for the empty packing).
#[inline]
pub fn branch_exponent(vector: &PackingVector) -> usize {
    match vector.deepest_one() {
        Some(index) => vector.len() - 1 - index,
        None => vector.len(),
    }
}

/// Number of ordinals in the subtree rooted at `vector`.
#[inline]
pub fn branch_size(vector: &PackingVector) -> BigUint {
    BigUint::one() << branch_exponent(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("111", 1; "leaf")]
    #[test_case("110", 2; "one trailing zero")]
    #[test_case("100", 4; "two trailing zeros")]
    #[test_case("000", 8; "whole tree")]
    #[test_case("0101000", 8; "inner node")]
    fn branch_sizes(bits: &str, expected: u32) {
        let vector: PackingVector = bits.parse().unwrap();
        assert_eq!(branch_size(&vector), BigUint::from(expected));
    }
}
