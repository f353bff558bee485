//! Defines [`WeakLearner`], the shared decision stump found in one round.
use serde::{Serialize, Deserialize};

use crate::SharingSet;

use std::fmt;


/// A decision stump shared by a subset of the classes.
///
/// For a class `c` in the sharing set `n`, the stump outputs
/// `a + b` if the value of feature `d` is greater than `theta`,
/// and `b` otherwise.
/// Every other class outputs its constant `k[c]`.
/// `k[c]` is zero for the classes in `n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakLearner {
    /// Feature index.
    pub d: usize,
    /// Threshold.
    pub theta: i32,
    /// Sharing set.
    pub n: SharingSet,
    /// Confidence added above the threshold.
    pub a: f64,
    /// Confidence below the threshold.
    pub b: f64,
    /// Constants for the classes not in `n`.
    pub k: Vec<f64>,
    /// Weighted squared error on the training examples.
    /// `f64::INFINITY` if the round found nothing.
    pub error: f64,
    /// Time spent to find this weak learner (milliseconds).
    pub time_taken: f64,
}


impl WeakLearner {
    /// The weak learner returned by a round that found no valid stump.
    pub fn sentinel(n_classes: usize) -> Self {
        Self {
            d: 0,
            theta: 0,
            n: SharingSet::empty(n_classes),
            a: 0f64,
            b: 0f64,
            k: vec![0f64; n_classes],
            error: f64::INFINITY,
            time_taken: 0f64,
        }
    }

    /// Returns `true` if this weak learner carries a finite error,
    /// i.e., it is not a sentinel.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_finite()
    }

    /// The number of classes this weak learner is defined over.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.k.len()
    }

    /// The confidence for the classes in the sharing set.
    #[inline(always)]
    pub fn shared_confidence(&self, value: i32) -> f64 {
        if value > self.theta { self.a + self.b } else { self.b }
    }

    /// The confidence for `class` on an example whose
    /// feature `d` takes `value`.
    #[inline(always)]
    pub fn confidence(&self, value: i32, class: usize) -> f64 {
        if self.n.contains(class) {
            self.shared_confidence(value)
        } else {
            self.k[class]
        }
    }

    /// Returns `true` if both weak learners define the same rule
    /// and error, ignoring the time it took to find them.
    pub fn same_rule(&self, other: &Self) -> bool {
        self.d == other.d
            && self.theta == other.theta
            && self.n == other.n
            && self.a.to_bits() == other.a.to_bits()
            && self.b.to_bits() == other.b.to_bits()
            && self.error.to_bits() == other.error.to_bits()
            && self.k.len() == other.k.len()
            && self.k.iter()
                .zip(&other.k)
                .all(|(x, y)| x.to_bits() == y.to_bits())
    }
}


impl fmt::Display for WeakLearner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let k = self.k.iter()
            .map(|k| format!("{k:.5}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "wl = {{ d={}, error={}, time={:.1}ms, a={}, b={}, \
            k[]={{ {k} }}, theta={}, classes={} }}",
            self.d, self.error, self.time_taken,
            self.a, self.b, self.theta, self.n,
        )
    }
}
