//! Knapsack instances and packing vectors

mod vector;

pub use vector::PackingVector;

use num_bigint::BigUint;

use crate::domain::MIN_TASK_SIZE;
use crate::TreeError;

/// Subset-sum instance: item weights and the weight to hit.
///
/// Weights are unsigned, which is what makes pruning sound: every packing
/// in the subtree below a node is at least as heavy as the node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knapsack {
    weights: Vec<BigUint>,
    target: BigUint,
}

impl Knapsack {
    /// Create an instance; requires at least 3 items.
    pub fn new(weights: Vec<BigUint>, target: BigUint) -> Result<Self, TreeError> {
        if weights.len() < MIN_TASK_SIZE {
            return Err(TreeError::InvalidSize {
                task_size: weights.len(),
            });
        }
        Ok(Self { weights, target })
    }

    /// Convenience constructor from machine integers.
    pub fn from_u64(weights: &[u64], target: u64) -> Result<Self, TreeError> {
        Self::new(
            weights.iter().map(|&w| BigUint::from(w)).collect(),
            BigUint::from(target),
        )
    }

    /// Task size n (number of items).
    #[inline]
    pub fn task_size(&self) -> usize {
        self.weights.len()
    }

    /// Item weights.
    #[inline]
    pub fn weights(&self) -> &[BigUint] {
        &self.weights
    }

    /// Target weight.
    #[inline]
    pub fn target(&self) -> &BigUint {
        &self.target
    }

    /// Sum of all item weights.
    pub fn total_weight(&self) -> BigUint {
        self.weights.iter().sum()
    }

    /// Weight of a packing; fails if the vector has the wrong length.
    pub fn weigh(&self, vector: &PackingVector) -> Result<BigUint, TreeError> {
        if vector.len() != self.weights.len() {
            return Err(TreeError::VectorLength {
                expected: self.weights.len(),
                found: vector.len(),
            });
        }
        Ok(vector.weight(&self.weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_tiny_instances() {
        assert!(matches!(
            Knapsack::from_u64(&[1, 2], 3),
            Err(TreeError::InvalidSize { task_size: 2 })
        ));
    }

    #[test]
    fn test_weigh() {
        let knapsack = Knapsack::from_u64(&[4, 6, 9], 10).unwrap();
        assert_eq!(knapsack.total_weight(), BigUint::from(19u32));
        let vector: PackingVector = "110".parse().unwrap();
        assert_eq!(knapsack.weigh(&vector).unwrap(), BigUint::from(10u32));
    }

    #[test]
    fn test_weigh_rejects_short_vector() {
        let knapsack = Knapsack::from_u64(&[4, 6, 9], 10).unwrap();
        assert_eq!(
            knapsack.weigh(&"11".parse().unwrap()),
            Err(TreeError::VectorLength {
                expected: 3,
                found: 2
            })
        );
    }
}
