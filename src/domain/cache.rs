//! Domain size cache
//!
//! Starting ordinal of every domain at every collapse level. The search
//! sequence is fixed and the size of each multinode is known, so the first
//! node of each subtree can be computed once per task size.
//!
//! Domains 7, 5, 6 and 4 consist of a root followed by a body; the body of
//! 7 holds the level's 3-labelled nodes, the body of 5 the 1-labelled ones,
//! the body of 6 the 2-labelled ones and the body of 4 the 0-labelled ones.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use super::{domain_size, leaf_count, max_depth, ReductionRate, MIN_TASK_SIZE};
use crate::TreeError;

/// Offsets stored per collapse level.
pub const OFFSETS_PER_LEVEL: usize = 12;

/// Slot within a level's offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Offset {
    /// Root of domain 0
    Start0 = 0,
    /// Root of domain 1
    Start1 = 1,
    /// Root of domain 2
    Start2 = 2,
    /// Root of domain 3
    Start3 = 3,
    /// Root and body of domain 4
    Start4 = 4,
    /// Root and body of domain 5
    Start5 = 5,
    /// Root and body of domain 6
    Start6 = 6,
    /// Root and body of domain 7
    Start7 = 7,
    /// Body of domain 7
    Body7 = 8,
    /// Body of domain 5
    Body5 = 9,
    /// Body of domain 6
    Body6 = 10,
    /// Body of domain 4
    Body4 = 11,
}

/// The 12 offsets of one collapse level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelOffsets {
    offsets: [BigUint; OFFSETS_PER_LEVEL],
}

impl LevelOffsets {
    /// Offset stored in `slot`.
    #[inline]
    pub fn get(&self, slot: Offset) -> &BigUint {
        &self.offsets[slot as usize]
    }

    /// All offsets in slot order.
    pub fn as_slice(&self) -> &[BigUint] {
        &self.offsets
    }

    fn build(level: usize, outermost: bool, rate: ReductionRate) -> Self {
        // Reducers stop the offsets from advancing over domains that the
        // outermost level does not have, so those collapse onto their
        // neighbour. Rate 1 drops 1, 3, 7, 5; rate 2 also drops 2, 6.
        let r1 = !(outermost && rate.value() >= 1);
        let r2 = !(outermost && rate.value() >= 2);

        let size = domain_size(level);
        let half = BigUint::one() + (&size - 1u32) / 2u32;
        let unit = BigUint::one();
        let gate = |amount: &BigUint, on: bool| if on { amount.clone() } else { BigUint::zero() };

        let start0 = BigUint::zero();
        // artificial wall: domain 1 always starts right after the root
        let start1 = &start0 + &unit;
        let start3 = &start1 + gate(&unit, r1);
        let start7 = &start3 + gate(&unit, r1);
        let body7 = &start7 + gate(&half, r1);
        let start5 = &start7 + gate(&size, r1);
        let body5 = &start5 + gate(&half, r1);
        let start2 = &start5 + gate(&size, r1 && r2);
        let start6 = &start2 + gate(&unit, r2);
        let body6 = &start6 + gate(&half, r2);
        let start4 = &start6 + gate(&size, r2);
        let body4 = &start4 + &half;

        Self {
            offsets: [
                start0, start1, start2, start3, start4, start5, start6, start7, body7, body5,
                body6, body4,
            ],
        }
    }
}

/// Precomputed domain offsets for one task size.
///
/// Built once, read-only afterwards and shared by reference between
/// workers. Dropping it releases the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSizeCache {
    task_size: usize,
    max_depth: usize,
    reduction: ReductionRate,
    levels: Vec<LevelOffsets>,
    leaf_count: BigUint,
}

impl DomainSizeCache {
    /// Build the cache for `task_size` variables.
    ///
    /// Fails with [`TreeError::InvalidSize`] when `task_size < 3`.
    pub fn new(task_size: usize) -> Result<Self, TreeError> {
        if task_size < MIN_TASK_SIZE {
            return Err(TreeError::InvalidSize { task_size });
        }

        let depth = max_depth(task_size);
        let reduction = ReductionRate::for_task_size(task_size);
        let levels = (0..=depth)
            .map(|level| LevelOffsets::build(level, level == depth, reduction))
            .collect();

        debug!(
            task_size,
            max_depth = depth,
            reduction = reduction.value(),
            "built domain size cache"
        );

        Ok(Self {
            task_size,
            max_depth: depth,
            reduction,
            levels,
            leaf_count: leaf_count(task_size),
        })
    }

    /// Task size the cache was built for.
    #[inline]
    pub fn task_size(&self) -> usize {
        self.task_size
    }

    /// Outermost collapse level.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Reduction of the outermost level.
    #[inline]
    pub fn reduction(&self) -> ReductionRate {
        self.reduction
    }

    /// Number of packings, `2^n`.
    #[inline]
    pub fn leaf_count(&self) -> &BigUint {
        &self.leaf_count
    }

    /// Offsets of one collapse level, if it exists.
    pub fn level(&self, level: usize) -> Option<&LevelOffsets> {
        self.levels.get(level)
    }

    /// All levels, innermost first.
    pub fn levels(&self) -> &[LevelOffsets] {
        &self.levels
    }

    /// Shorthand for `level(level)?.get(slot)`.
    pub fn offset(&self, level: usize, slot: Offset) -> Option<&BigUint> {
        self.level(level).map(|offsets| offsets.get(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_u64(offsets: &LevelOffsets) -> Vec<u64> {
        offsets
            .as_slice()
            .iter()
            .map(|value| value.to_u64_digits().first().copied().unwrap_or(0))
            .collect()
    }

    #[test]
    fn test_rejects_small_task_sizes() {
        for n in 0..3 {
            assert!(matches!(
                DomainSizeCache::new(n),
                Err(TreeError::InvalidSize { task_size }) if task_size == n
            ));
        }
    }

    #[test]
    fn test_base_level_offsets() {
        // n = 3: one full level, domains 0,1,3,7,5,2,6,4 at ordinals 0..8
        let cache = DomainSizeCache::new(3).unwrap();
        assert_eq!(cache.levels().len(), 1);
        // slots: 0 1 2 3 4 5 6 7 body7 body5 body6 body4
        assert_eq!(as_u64(&cache.levels()[0]), vec![0, 1, 5, 2, 7, 4, 6, 3, 4, 5, 7, 8]);
    }

    #[test]
    fn test_full_inner_level_offsets() {
        // Level 1 of n = 6: domain 7 starts at 3, its body at 11, domain 5 at 18 ...
        let cache = DomainSizeCache::new(6).unwrap();
        let outer = cache.level(1).unwrap();
        assert_eq!(as_u64(outer), vec![0, 1, 33, 2, 49, 18, 34, 3, 11, 26, 42, 57]);
    }

    #[test]
    fn test_reduced_outermost_level_collapses_absent_domains() {
        // n = 4: outermost level keeps only domains 0 and 4
        let cache = DomainSizeCache::new(4).unwrap();
        assert_eq!(cache.reduction(), ReductionRate::Quarter);
        let outer = cache.level(1).unwrap();
        assert_eq!(outer.get(Offset::Start1), outer.get(Offset::Start4));
        assert_eq!(outer.get(Offset::Start1), &BigUint::from(1u32));
        assert_eq!(outer.get(Offset::Body4), &BigUint::from(9u32));

        // n = 5: outermost keeps 0, 2, 6, 4
        let cache = DomainSizeCache::new(5).unwrap();
        let outer = cache.level(1).unwrap();
        assert_eq!(outer.get(Offset::Start3), outer.get(Offset::Start1));
        assert_eq!(outer.get(Offset::Start2), &BigUint::from(1u32));
        assert_eq!(outer.get(Offset::Start6), &BigUint::from(2u32));
    }

    #[test]
    fn test_initialization_is_idempotent() {
        for n in 3..20 {
            let first = DomainSizeCache::new(n).unwrap();
            let second = DomainSizeCache::new(n).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.max_depth(), max_depth(n));
        }
    }
}
