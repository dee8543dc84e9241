//! Packing vectors
//!
//! One bit per knapsack item; bit `i` set means item `i` is packed.
//! Index 0 is the most significant variable (the first decision of the
//! tree), index n - 1 the least significant one.

use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;
use num_bigint::BigUint;

use crate::TreeError;

/// n-bit packing vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackingVector {
    bits: BitVec,
}

impl PackingVector {
    /// All items excluded: the root of the packing tree.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: bitvec![0; len],
        }
    }

    /// Build from booleans, index 0 first.
    pub fn from_bools(bits: &[bool]) -> Self {
        Self {
            bits: bits.iter().copied().collect(),
        }
    }

    /// Number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the vector has no items at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit `index`; out-of-range reads are `false`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).map(|bit| *bit).unwrap_or(false)
    }

    /// Set bit `index`.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        self.bits.set(index, value);
    }

    /// Index of the deepest packed item (highest set index).
    #[inline]
    pub fn deepest_one(&self) -> Option<usize> {
        self.bits.last_one()
    }

    /// Number of packed items.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Indices of packed items, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Sum of the weights of packed items.
    pub fn weight(&self, items: &[BigUint]) -> BigUint {
        self.ones()
            .filter_map(|index| items.get(index))
            .fold(BigUint::default(), |acc, weight| acc + weight)
    }

    /// Underlying bits.
    pub fn as_bitslice(&self) -> &BitSlice {
        &self.bits
    }
}

impl fmt::Display for PackingVector {
    /// `0`/`1` per item, index 0 first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for PackingVector {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(TreeError::MalformedVector(s.to_string())),
            })
            .collect::<Result<BitVec, _>>()?;
        Ok(Self { bits })
    }
}
