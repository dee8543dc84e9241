//! Domain start offsets for encoding
//!
//! Distance from the root of a level's multinode to the first packing of a
//! given label. A label is read in the trivial context when every level
//! below it is labelled 0; otherwise the packing lies in the body of one of
//! the rooted domains and the general context applies. The case table is
//! kept exactly as derived from the base subtree layout.

use num_bigint::BigUint;

use crate::domain::{domain_size, Domain, ReductionRate};
use crate::TreeError;

/// `constant + spans * S + (S / 2 if half_span)`, with S the level's domain size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DomainStart {
    constant: u32,
    spans: u32,
    half_span: bool,
}

const fn start(constant: u32, spans: u32, half_span: bool) -> Option<DomainStart> {
    Some(DomainStart {
        constant,
        spans,
        half_span,
    })
}

impl DomainStart {
    /// Table lookup; `None` when the label has no start in this context.
    pub(crate) fn lookup(domain: Domain, rate: ReductionRate, trivial: bool) -> Option<Self> {
        use Domain::*;

        match (rate, trivial) {
            (ReductionRate::Full, true) => match domain {
                Zero => start(0, 0, false),
                One => start(1, 0, false),
                Three => start(2, 0, false),
                Seven => start(3, 0, false),
                Five => start(3, 1, false),
                Two => start(3, 2, false),
                Six => start(4, 2, false),
                Four => start(4, 3, false),
            },
            (ReductionRate::Full, false) => match domain {
                // first subdomain
                Seven => start(3, 0, false),
                Five => start(3, 1, false),
                Six => start(4, 2, false),
                Four => start(4, 3, false),
                // second subdomain
                Zero => start(4, 3, true),
                One => start(3, 1, true),
                Three => start(3, 0, true),
                Two => start(4, 2, true),
            },
            (ReductionRate::Half, true) => match domain {
                Zero => start(0, 0, false),
                Two => start(1, 0, false),
                Six => start(2, 0, false),
                Four => start(2, 1, false),
                _ => None,
            },
            (ReductionRate::Half, false) => match domain {
                Six => start(2, 0, false),
                Four => start(2, 1, false),
                Zero => start(2, 1, true),
                Two => start(2, 0, true),
                _ => None,
            },
            (ReductionRate::Quarter, true) => match domain {
                Zero => start(0, 0, false),
                Four => start(1, 0, false),
                _ => None,
            },
            (ReductionRate::Quarter, false) => match domain {
                Four => start(1, 0, false),
                Zero => start(1, 0, true),
                _ => None,
            },
        }
    }

    /// Evaluate for a collapse level.
    pub(crate) fn at_level(self, level: usize) -> BigUint {
        let size = domain_size(level);
        let mut value = BigUint::from(self.constant) + &size * self.spans;
        if self.half_span {
            value += &size / 2u32;
        }
        value
    }
}

/// Start of `domain` at `level`, or [`TreeError::UnmappedLiteral`].
pub(crate) fn domain_start(
    domain: Domain,
    level: usize,
    rate: ReductionRate,
    trivial: bool,
) -> Result<BigUint, TreeError> {
    DomainStart::lookup(domain, rate, trivial)
        .map(|start| start.at_level(level))
        .ok_or(TreeError::UnmappedLiteral {
            level,
            label: domain.label(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_level_starts_follow_visitation_order() {
        // at level 0 the trivial full table is the ordinal of each domain
        for (rank, domain) in crate::domain::VISITATION_ORDER.iter().enumerate() {
            let value = domain_start(*domain, 0, ReductionRate::Full, true).unwrap();
            assert_eq!(value, BigUint::from(rank));
        }
    }

    #[test]
    fn test_general_context_lands_in_bodies() {
        // level 1 (S = 15): body of 7 starts at 11, body of 5 at 26
        let three = domain_start(Domain::Three, 1, ReductionRate::Full, false).unwrap();
        assert_eq!(three, BigUint::from(10u32));
        let one = domain_start(Domain::One, 1, ReductionRate::Full, false).unwrap();
        assert_eq!(one, BigUint::from(25u32));
    }

    #[test]
    fn test_absent_domains_are_unmapped() {
        let err = domain_start(Domain::Seven, 2, ReductionRate::Half, true).unwrap_err();
        assert!(matches!(err, TreeError::UnmappedLiteral { level: 2, label: 7 }));
        assert!(domain_start(Domain::Two, 1, ReductionRate::Quarter, false).is_err());
    }
}
