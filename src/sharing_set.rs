//! Defines [`SharingSet`], the set of classes sharing one stump.
use fixedbitset::FixedBitSet;
use serde::{Serialize, Deserialize};

use std::fmt;


/// A subset of the classes `0..C`.
///
/// The classes in the set share a single pair of confidences `(a, b)`;
/// the others fall back to their per-class constant `k[c]`.
/// The set is immutable: [`SharingSet::with`] returns a new set.
/// Two sets are equal if they are built for the same number of classes
/// and have the same members.
///
/// There is no limit on the number of classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "SharingSetRepr", into = "SharingSetRepr")]
pub struct SharingSet {
    bits: FixedBitSet,
}


// Serialized form of `SharingSet`.
#[derive(Serialize, Deserialize)]
struct SharingSetRepr {
    n_classes: usize,
    classes: Vec<usize>,
}


impl From<SharingSet> for SharingSetRepr {
    fn from(set: SharingSet) -> Self {
        Self {
            n_classes: set.n_classes(),
            classes: set.classes().collect(),
        }
    }
}


impl From<SharingSetRepr> for SharingSet {
    fn from(repr: SharingSetRepr) -> Self {
        // Grow to fit out-of-range members instead of panicking.
        let n_classes = repr.classes.iter()
            .map(|&c| c + 1)
            .fold(repr.n_classes, usize::max);
        let mut bits = FixedBitSet::with_capacity(n_classes);
        repr.classes.into_iter().for_each(|c| bits.insert(c));
        Self { bits }
    }
}


impl SharingSet {
    /// Returns the empty set over `n_classes` classes.
    #[inline]
    pub fn empty(n_classes: usize) -> Self {
        Self { bits: FixedBitSet::with_capacity(n_classes) }
    }

    /// Returns the set of the given classes.
    /// Panics if a class is not in `[0, n_classes)`.
    pub fn from_classes<I>(n_classes: usize, classes: I) -> Self
        where I: IntoIterator<Item = usize>
    {
        classes.into_iter()
            .fold(Self::empty(n_classes), |set, c| set.with(c))
    }

    /// Returns `self ∪ {class}`.
    /// Panics if `class` is not in `[0, C)`.
    #[inline]
    pub fn with(&self, class: usize) -> Self {
        assert!(
            class < self.n_classes(),
            "class {class} is out of range [0, {})", self.n_classes()
        );
        let mut bits = self.bits.clone();
        bits.insert(class);
        Self { bits }
    }

    /// Returns `true` if `class` is in the set.
    /// Classes outside `[0, C)` are never members.
    #[inline(always)]
    pub fn contains(&self, class: usize) -> bool {
        self.bits.contains(class)
    }

    /// Returns `true` if no class is in the set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of classes in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// The number of classes `C` this set is defined over.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.bits.len()
    }

    /// Iterates over the members in ascending order.
    #[inline]
    pub fn classes(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    /// Returns `true` if every member of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.classes().all(|c| other.contains(c))
    }
}


impl fmt::Display for SharingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes = self.classes()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{{ {classes} }}")
    }
}
