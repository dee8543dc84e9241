//! Incremental search cursor
//!
//! Keeps a packing vector and its weight in step with the depth-first
//! traversal, so the cursor search mode never re-decodes an ordinal or
//! re-sums a packing. Each transition flips at most three bits and adjusts
//! the running weight by the same items.

use num_bigint::BigUint;

use crate::codec::OrdinalCodec;
use crate::packing::{Knapsack, PackingVector};
use crate::TreeError;

/// Packing vector plus running weight, tied to the instance it weighs.
///
/// The vector always has one bit per item of the borrowed [`Knapsack`], so
/// every transition finds the weight it adds or removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCursor<'a> {
    knapsack: &'a Knapsack,
    vector: PackingVector,
    weight: BigUint,
}

impl<'a> SearchCursor<'a> {
    /// Start at `vector`, summing its weight once.
    ///
    /// Fails with [`TreeError::VectorLength`] unless `vector` has one bit
    /// per item.
    pub fn new(vector: PackingVector, knapsack: &'a Knapsack) -> Result<Self, TreeError> {
        let weight = knapsack.weigh(&vector)?;
        Ok(Self {
            knapsack,
            vector,
            weight,
        })
    }

    /// Start at the packing with ordinal `ordinal`.
    pub fn at_ordinal(
        codec: &OrdinalCodec,
        ordinal: &BigUint,
        knapsack: &'a Knapsack,
    ) -> Result<Self, TreeError> {
        Self::new(codec.decode(ordinal)?, knapsack)
    }

    /// Current packing.
    #[inline]
    pub fn vector(&self) -> &PackingVector {
        &self.vector
    }

    /// Running weight of the current packing.
    #[inline]
    pub fn weight(&self) -> &BigUint {
        &self.weight
    }

    /// Whether the least significant item (index n - 1) is packed, i.e. the
    /// cursor sits on a leaf of the packing tree.
    #[inline]
    pub fn leaf_bit_set(&self) -> bool {
        let n = self.vector.len();
        n > 0 && self.vector.get(n - 1)
    }

    /// Consume the cursor.
    pub fn into_parts(self) -> (PackingVector, BigUint) {
        (self.vector, self.weight)
    }

    /// Move to the next sibling subtree: unpack the deepest item, pack the
    /// one after it.
    pub fn step_side(&mut self) -> &BigUint {
        if let Some(index) = self.vector.deepest_one() {
            if index + 1 < self.vector.len() {
                self.unpack(index);
                self.pack(index + 1);
            }
        }
        &self.weight
    }

    /// Descend one level: pack the item after the deepest packed one, or the
    /// first item from the root.
    pub fn step_forward(&mut self) -> &BigUint {
        let next = self.vector.deepest_one().map_or(0, |index| index + 1);
        if next < self.vector.len() {
            self.pack(next);
        }
        &self.weight
    }

    /// Leave an exhausted leaf: unpack the last item, then step sideways.
    pub fn step_back(&mut self) -> &BigUint {
        let n = self.vector.len();
        if n > 0 && self.vector.get(n - 1) {
            self.unpack(n - 1);
        }
        self.step_side()
    }

    fn pack(&mut self, index: usize) {
        self.vector.set(index, true);
        self.weight += &self.knapsack.weights()[index];
    }

    fn unpack(&mut self, index: usize) {
        self.vector.set(index, false);
        self.weight -= &self.knapsack.weights()[index];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack() -> Knapsack {
        Knapsack::from_u64(&[1, 10, 100], 1000).unwrap()
    }

    #[test]
    fn test_transitions_walk_base_tree_in_order() {
        let knapsack = knapsack();
        let mut cursor = SearchCursor::new(PackingVector::zeros(3), &knapsack).unwrap();
        let mut seen = vec![cursor.vector().to_string()];

        // never pruning: forward until a leaf, back from a leaf
        for _ in 0..7 {
            if cursor.leaf_bit_set() {
                cursor.step_back();
            } else {
                cursor.step_forward();
            }
            seen.push(cursor.vector().to_string());
        }
        assert_eq!(
            seen,
            ["000", "100", "110", "111", "101", "010", "011", "001"]
        );
    }

    #[test]
    fn test_running_weight_tracks_vector() {
        let knapsack = knapsack();
        let mut cursor = SearchCursor::new("100".parse().unwrap(), &knapsack).unwrap();

        assert_eq!(cursor.step_forward(), &BigUint::from(11u32));
        assert_eq!(cursor.step_side(), &BigUint::from(101u32));
        assert_eq!(cursor.vector().to_string(), "101");
        assert_eq!(cursor.step_back(), &BigUint::from(10u32));
        assert_eq!(cursor.vector().to_string(), "010");
    }

    #[test]
    fn test_weight_matches_fresh_sum_after_every_move() {
        let knapsack = Knapsack::from_u64(&[7, 1, 30, 2, 11, 5, 19], 0).unwrap();
        let mut cursor = SearchCursor::new(PackingVector::zeros(7), &knapsack).unwrap();

        // mix all three moves over a whole walk of the tree
        for step in 0..200 {
            if cursor.leaf_bit_set() {
                cursor.step_back();
            } else if step % 3 == 0 {
                cursor.step_side();
            } else {
                cursor.step_forward();
            }
            let expected = knapsack.weigh(cursor.vector()).unwrap();
            assert_eq!(cursor.weight(), &expected, "after {}", cursor.vector());
        }
    }

    #[test]
    fn test_rejects_vector_of_wrong_length() {
        let knapsack = knapsack();
        assert_eq!(
            SearchCursor::new(PackingVector::zeros(4), &knapsack),
            Err(TreeError::VectorLength {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_exhausted_tree_is_stable() {
        let knapsack = knapsack();
        let mut cursor = SearchCursor::new("001".parse().unwrap(), &knapsack).unwrap();
        cursor.step_back();
        assert_eq!(cursor.vector(), &PackingVector::zeros(3));
        assert_eq!(cursor.weight(), &BigUint::default());
        cursor.step_side();
        assert_eq!(cursor.vector(), &PackingVector::zeros(3));
    }

    #[test]
    fn test_at_ordinal_matches_decode() {
        let knapsack = knapsack();
        let codec = OrdinalCodec::new(3).unwrap();
        let cursor = SearchCursor::at_ordinal(&codec, &BigUint::from(4u32), &knapsack).unwrap();
        assert_eq!(cursor.vector().to_string(), "101");
        assert_eq!(cursor.weight(), &BigUint::from(101u32));
    }
}
