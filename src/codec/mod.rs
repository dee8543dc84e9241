//! Packing tree linearization
//!
//! Translates packing vectors into their ordinal numbers in the depth-first
//! traversal and back, through the intermediate literal string:
//!
//! ```text
//! ordinal --literal_for_ordinal--> literal --vector_for_literal--> vector
//! vector  --literal_for_vector---> literal --ordinal_for_literal-> ordinal
//! ```
//!
//! Every call is O(levels) big-integer operations; nothing is materialized.

mod literal;
mod start;

pub use literal::{LiteralString, Sentinel, Slot};

use std::ops::Range;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;

use crate::domain::{Domain, DomainSizeCache, Offset, ReductionRate};
use crate::packing::PackingVector;
use crate::TreeError;

/// Whether a decode step subtracts a domain root or a domain body.
#[derive(Debug, Clone, Copy)]
enum Base {
    Root(Offset),
    Body(Offset),
}

/// Upper bounds checked in visitation order, with the label and base that
/// apply when the residual falls below the bound.
const DECODE_STEPS: [(Offset, Base, Domain); 11] = [
    (Offset::Start1, Base::Root(Offset::Start0), Domain::Zero),
    (Offset::Start3, Base::Root(Offset::Start1), Domain::One),
    (Offset::Start7, Base::Root(Offset::Start3), Domain::Three),
    (Offset::Body7, Base::Root(Offset::Start7), Domain::Seven),
    (Offset::Start5, Base::Body(Offset::Body7), Domain::Three),
    (Offset::Body5, Base::Root(Offset::Start5), Domain::Five),
    (Offset::Start2, Base::Body(Offset::Body5), Domain::One),
    (Offset::Start6, Base::Root(Offset::Start2), Domain::Two),
    (Offset::Body6, Base::Root(Offset::Start6), Domain::Six),
    (Offset::Start4, Base::Body(Offset::Body6), Domain::Two),
    (Offset::Body4, Base::Root(Offset::Start4), Domain::Four),
];

/// Beyond every bound: body of domain 4, labelled 0.
const DECODE_TAIL: (Base, Domain) = (Base::Body(Offset::Body4), Domain::Zero);

/// Bidirectional ordinal <-> packing vector mapping for one task size.
///
/// Owns its [`DomainSizeCache`] behind an `Arc`, so clones are cheap and
/// workers share one table.
#[derive(Debug, Clone)]
pub struct OrdinalCodec {
    cache: Arc<DomainSizeCache>,
}

impl OrdinalCodec {
    /// Build the cache for `task_size` and wrap it.
    pub fn new(task_size: usize) -> Result<Self, TreeError> {
        Ok(Self::from_cache(Arc::new(DomainSizeCache::new(task_size)?)))
    }

    /// Use an already built cache.
    pub fn from_cache(cache: Arc<DomainSizeCache>) -> Self {
        Self { cache }
    }

    /// Underlying offset table.
    pub fn cache(&self) -> &DomainSizeCache {
        &self.cache
    }

    /// Task size n.
    #[inline]
    pub fn task_size(&self) -> usize {
        self.cache.task_size()
    }

    /// Number of ordinals, `2^n`.
    #[inline]
    pub fn leaf_count(&self) -> &BigUint {
        self.cache.leaf_count()
    }

    /// Packing vector at `ordinal`.
    pub fn decode(&self, ordinal: &BigUint) -> Result<PackingVector, TreeError> {
        let literal = self.literal_for_ordinal(ordinal)?;
        self.vector_for_literal(&literal)
    }

    /// Ordinal of `vector`.
    pub fn encode(&self, vector: &PackingVector) -> Result<BigUint, TreeError> {
        let literal = self.literal_for_vector(vector)?;
        self.ordinal_for_literal(&literal)
    }

    /// Locate the domain of `ordinal` at every level, outermost first.
    pub fn literal_for_ordinal(&self, ordinal: &BigUint) -> Result<LiteralString, TreeError> {
        if ordinal >= self.leaf_count() {
            return Err(TreeError::OrdinalOutOfRange {
                ordinal: ordinal.clone(),
                task_size: self.task_size(),
            });
        }

        let levels = self.cache.levels();
        let mut labels = vec![Domain::Zero; levels.len()];
        let mut residual = ordinal.clone();

        for (level, offsets) in levels.iter().enumerate().rev() {
            let (base, domain) = DECODE_STEPS
                .iter()
                .find(|(bound, _, _)| residual < *offsets.get(*bound))
                .map(|&(_, base, domain)| (base, domain))
                .unwrap_or(DECODE_TAIL);

            match base {
                Base::Root(slot) => residual -= offsets.get(slot),
                Base::Body(slot) => {
                    // bodies hold the sub-root nodes, which skip the inner root
                    residual -= offsets.get(slot);
                    residual += 1u32;
                }
            }
            labels[level] = domain;
        }

        Ok(LiteralString::from_levels(labels, self.cache.reduction()))
    }

    /// Expand a literal string into its packing vector.
    ///
    /// At a reduced outermost level only the trailing `3 - rate` pattern
    /// bits are emitted; a label with any leading bit set does not exist
    /// there and yields [`TreeError::UnmappedLiteral`].
    pub fn vector_for_literal(&self, literal: &LiteralString) -> Result<PackingVector, TreeError> {
        self.check_literal_length(literal)?;
        let mut vector = PackingVector::zeros(self.task_size());
        let mut caret = 0;

        for (level, &domain) in literal.levels().iter().enumerate().rev() {
            let skip = literal.reduction_at(level).missing_bits();
            let pattern = domain.pattern();
            if pattern[..skip].iter().any(|&bit| bit) {
                return Err(TreeError::UnmappedLiteral {
                    level,
                    label: domain.label(),
                });
            }
            for &bit in &pattern[skip..] {
                if caret >= vector.len() {
                    return Err(TreeError::UnmappedLiteral {
                        level,
                        label: domain.label(),
                    });
                }
                vector.set(caret, bit);
                caret += 1;
            }
        }

        if caret != vector.len() {
            return Err(TreeError::VectorLength {
                expected: vector.len(),
                found: caret,
            });
        }
        Ok(vector)
    }

    /// Read the domain labels off a packing vector.
    pub fn literal_for_vector(&self, vector: &PackingVector) -> Result<LiteralString, TreeError> {
        let n = self.task_size();
        if vector.len() != n {
            return Err(TreeError::VectorLength {
                expected: n,
                found: vector.len(),
            });
        }

        let reduction = self.cache.reduction();
        let levels = self.cache.levels().len();
        let mut labels = Vec::with_capacity(levels);
        let mut end = n;

        for level in 0..levels {
            // groups of three from the least significant end; the outermost
            // group fills only the trailing pattern positions
            let width = if level + 1 == levels {
                reduction.emitted_bits()
            } else {
                3
            };
            let begin = end - width;
            let mut pattern = [false; 3];
            for (slot, index) in (3 - width..3).zip(begin..end) {
                pattern[slot] = vector.get(index);
            }
            labels.push(Domain::from_pattern(pattern));
            end = begin;
        }

        Ok(LiteralString::from_levels(labels, reduction))
    }

    /// Sum the domain starts of every level, innermost first.
    pub fn ordinal_for_literal(&self, literal: &LiteralString) -> Result<BigUint, TreeError> {
        self.check_literal_length(literal)?;
        let mut ordinal = BigUint::default();
        let mut level: isize = 0;

        while let Slot::Label(domain) = literal.slot(level) {
            let index = level as usize;
            let rate = match literal.slot(level + 1) {
                Slot::Sentinel(Sentinel::Topmost) => literal.reduction(),
                _ => ReductionRate::Full,
            };
            let trivial = literal.trivial_below(index);
            ordinal += start::domain_start(domain, index, rate, trivial)?;
            level += 1;
        }

        if &ordinal >= self.leaf_count() {
            return Err(TreeError::OrdinalOutOfRange {
                ordinal,
                task_size: self.task_size(),
            });
        }
        Ok(ordinal)
    }

    fn check_literal_length(&self, literal: &LiteralString) -> Result<(), TreeError> {
        let expected = self.cache.levels().len();
        if literal.len() != expected {
            return Err(TreeError::LiteralLength {
                expected,
                found: literal.len(),
            });
        }
        Ok(())
    }

    /// Decode every ordinal of `range` in visitation order.
    pub fn vectors(&self, range: Range<BigUint>) -> Vectors<'_> {
        Vectors {
            codec: self,
            next: range.start,
            end: range.end,
        }
    }
}

/// Iterator returned by [`OrdinalCodec::vectors`].
#[derive(Debug)]
pub struct Vectors<'a> {
    codec: &'a OrdinalCodec,
    next: BigUint,
    end: BigUint,
}

impl Iterator for Vectors<'_> {
    type Item = Result<PackingVector, TreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let item = self.codec.decode(&self.next);
        self.next += BigUint::one();
        Some(item)
    }
}
