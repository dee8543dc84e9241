//! Literal strings
//!
//! A literal string names, for every collapse level, the base subtree a
//! packing belongs to. It sits between ordinal numbers and packing vectors.
//! Traversal loops terminate on the two sentinels, which live outside the
//! label buffer: looking past the outermost level yields `Topmost`, looking
//! below level 0 yields `Downmost`.

use std::fmt;

use crate::domain::{Domain, ReductionRate};

/// Boundary markers around the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// Above the outermost level.
    Topmost,
    /// Below level 0.
    Downmost,
}

/// Content at a (possibly out-of-range) level position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A domain label.
    Label(Domain),
    /// One of the boundary markers.
    Sentinel(Sentinel),
}

/// Per-level domain labels of one packing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralString {
    /// Indexed by collapse level, level 0 first.
    labels: Vec<Domain>,
    reduction: ReductionRate,
}

impl LiteralString {
    /// Build from labels ordered innermost (level 0) first.
    pub fn from_levels(labels: Vec<Domain>, reduction: ReductionRate) -> Self {
        Self { labels, reduction }
    }

    /// Build from labels ordered outermost first.
    pub fn from_outermost_first(mut labels: Vec<Domain>, reduction: ReductionRate) -> Self {
        labels.reverse();
        Self { labels, reduction }
    }

    /// Number of collapse levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no levels at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Reduction applying to the outermost level.
    #[inline]
    pub fn reduction(&self) -> ReductionRate {
        self.reduction
    }

    /// Reduction applying to `level` (only the outermost one is reduced).
    #[inline]
    pub fn reduction_at(&self, level: usize) -> ReductionRate {
        if level + 1 == self.labels.len() {
            self.reduction
        } else {
            ReductionRate::Full
        }
    }

    /// Label or sentinel at `level`; negative levels are below level 0.
    pub fn slot(&self, level: isize) -> Slot {
        if level < 0 {
            return Slot::Sentinel(Sentinel::Downmost);
        }
        match self.labels.get(level as usize) {
            Some(&domain) => Slot::Label(domain),
            None => Slot::Sentinel(Sentinel::Topmost),
        }
    }

    /// Label at an in-range level.
    pub fn get(&self, level: usize) -> Option<Domain> {
        self.labels.get(level).copied()
    }

    /// Labels, level 0 first.
    pub fn levels(&self) -> &[Domain] {
        &self.labels
    }

    /// Labels, outermost first.
    pub fn outermost_first(&self) -> impl Iterator<Item = Domain> + '_ {
        self.labels.iter().rev().copied()
    }

    /// Whether every level below `level` is labelled 0.
    pub fn trivial_below(&self, level: usize) -> bool {
        self.labels[..level.min(self.labels.len())]
            .iter()
            .all(|&domain| domain == Domain::Zero)
    }
}

impl fmt::Display for LiteralString {
    /// Outermost first, e.g. `73`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for domain in self.outermost_first() {
            write!(f, "{}", domain)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_bracket_labels() {
        let literal = LiteralString::from_levels(
            vec![Domain::Three, Domain::Seven],
            ReductionRate::Full,
        );
        assert_eq!(literal.slot(-1), Slot::Sentinel(Sentinel::Downmost));
        assert_eq!(literal.slot(0), Slot::Label(Domain::Three));
        assert_eq!(literal.slot(1), Slot::Label(Domain::Seven));
        assert_eq!(literal.slot(2), Slot::Sentinel(Sentinel::Topmost));
        assert_eq!(literal.to_string(), "73");
    }

    #[test]
    fn test_trivial_below() {
        let literal = LiteralString::from_outermost_first(
            vec![Domain::Four, Domain::Zero, Domain::Zero],
            ReductionRate::Quarter,
        );
        assert!(literal.trivial_below(0));
        assert!(literal.trivial_below(2));
        let literal = LiteralString::from_outermost_first(
            vec![Domain::Four, Domain::One, Domain::Zero],
            ReductionRate::Quarter,
        );
        assert!(literal.trivial_below(1));
        assert!(!literal.trivial_below(2));
    }

    #[test]
    fn test_only_outermost_is_reduced() {
        let literal = LiteralString::from_levels(
            vec![Domain::One, Domain::Two],
            ReductionRate::Half,
        );
        assert_eq!(literal.reduction_at(0), ReductionRate::Full);
        assert_eq!(literal.reduction_at(1), ReductionRate::Half);
    }
}
