//! The contract between the booster and whatever computes features.
//!
//! A [`FeatureProvider`] knows the training examples, their targets and
//! how to compute the integer value of any candidate feature on every
//! example. The booster never sees the examples themselves.
use serde::{Serialize, Deserialize};


/// The discretized thresholds `theta[t] = start + t * increment`
/// for `t = 0, 1, ..., count - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    start: i32,
    increment: i32,
    count: usize,
}


impl ThresholdLadder {
    /// Construct a new ladder.
    /// The ladder is validated when a booster is initialized.
    #[inline]
    pub fn new(start: i32, increment: i32, count: usize) -> Self {
        Self { start, increment, count, }
    }

    /// The smallest threshold.
    #[inline]
    pub fn start(&self) -> i32 {
        self.start
    }

    /// The step between two consecutive thresholds.
    #[inline]
    pub fn increment(&self) -> i32 {
        self.increment
    }

    /// The number of thresholds.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the ladder has no threshold.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the `t`-th threshold.
    #[inline]
    pub fn theta(&self, t: usize) -> i32 {
        debug_assert!(t < self.count);
        (self.start as i64 + t as i64 * self.increment as i64) as i32
    }

    /// Returns all thresholds in ascending order.
    pub fn thetas(&self) -> Vec<i32> {
        (0..self.count).map(|t| self.theta(t)).collect()
    }

    /// Returns the bin of `value`.
    ///
    /// Bin `t` holds the values in `(theta[t], theta[t + 1]]`,
    /// so that after accumulating from the top,
    /// bin `t` counts exactly the values **strictly** above `theta[t]`.
    /// Values above the last threshold fall in the last bin.
    /// Values not above `theta[0]` have no bin.
    #[inline(always)]
    pub fn bin(&self, value: i32) -> Option<usize> {
        let offset = value as i64 - self.start as i64 - 1;
        let t = offset.div_euclid(self.increment as i64);
        if t < 0 {
            None
        } else {
            Some((t as usize).min(self.count - 1))
        }
    }
}


/// The feature provider consumed by [`JointBoost`](crate::JointBoost).
///
/// All accessors are read-only after [`FeatureProvider::initialise`],
/// and [`FeatureProvider::feature_values`] may be called from
/// several threads at once when the booster runs in parallel.
pub trait FeatureProvider: Sync {
    /// Prepares the internal state.
    /// Called once by the booster before anything else.
    fn initialise(&mut self) {}

    /// The number of training examples `N`.
    fn n_examples(&self) -> usize;

    /// The number of candidate features `D`.
    fn n_features(&self) -> usize;

    /// The number of classes `C`.
    fn n_classes(&self) -> usize;

    /// The thresholds the stumps choose from.
    fn thresholds(&self) -> ThresholdLadder;

    /// The probability that a feature is examined in a round.
    fn accept_fraction(&self) -> f64 {
        1f64
    }

    /// The class index of each example.
    /// Called once when the booster is initialized.
    fn targets(&self) -> Vec<usize>;

    /// Writes the value of `feature` on every example into `values`.
    /// `values.len()` equals `N`.
    fn feature_values(&self, feature: usize, values: &mut [i32]);
}


/// A [`FeatureProvider`] over precomputed feature values held in memory.
///
/// # Example
/// ```
/// use jointboost::prelude::*;
///
/// // One feature over four examples.
/// let provider = DenseFeatures::new(
///         vec![vec![0, 10, 20, 30]],
///         vec![0, 0, 1, 1],
///         2,
///     )
///     .thresholds(5, 10, 2);
/// assert_eq!(provider.n_examples(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct DenseFeatures {
    // `values[d][i]` is the value of feature `d` on example `i`.
    values: Vec<Vec<i32>>,
    targets: Vec<usize>,
    n_classes: usize,
    ladder: ThresholdLadder,
    accept_fraction: f64,
}


impl DenseFeatures {
    /// Construct a new provider from feature-major values.
    /// By default, the thresholds are `0, 1, ..., 255`
    /// and every feature is examined in every round.
    pub fn new(
        values: Vec<Vec<i32>>,
        targets: Vec<usize>,
        n_classes: usize,
    ) -> Self
    {
        let n_examples = targets.len();
        assert!(
            values.iter().all(|column| column.len() == n_examples),
            "every feature must have exactly {n_examples} values"
        );
        Self {
            values,
            targets,
            n_classes,
            ladder: ThresholdLadder::new(0, 1, 256),
            accept_fraction: 1f64,
        }
    }

    /// Set the threshold ladder.
    pub fn thresholds(mut self, start: i32, increment: i32, count: usize)
        -> Self
    {
        self.ladder = ThresholdLadder::new(start, increment, count);
        self
    }

    /// Set the probability that a feature is examined in a round.
    pub fn accept_fraction(mut self, fraction: f64) -> Self {
        self.accept_fraction = fraction;
        self
    }

    /// Returns the values of feature `d`.
    pub fn column(&self, d: usize) -> &[i32] {
        &self.values[d][..]
    }
}


impl FeatureProvider for DenseFeatures {
    fn n_examples(&self) -> usize {
        self.targets.len()
    }

    fn n_features(&self) -> usize {
        self.values.len()
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn thresholds(&self) -> ThresholdLadder {
        self.ladder
    }

    fn accept_fraction(&self) -> f64 {
        self.accept_fraction
    }

    fn targets(&self) -> Vec<usize> {
        self.targets.clone()
    }

    fn feature_values(&self, feature: usize, values: &mut [i32]) {
        values.copy_from_slice(&self.values[feature][..]);
    }
}
