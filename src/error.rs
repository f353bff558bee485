//! Errors reported while setting up or resuming a boosting run.
//!
//! Numerical degeneracies inside a round are never reported here:
//! a degenerate candidate is skipped and a round that finds nothing
//! returns a weak learner with infinite error.
use thiserror::Error;


/// Errors of this crate.
#[derive(Debug, Error)]
pub enum JointBoostError {
    /// One of `N`, `D`, `C` or the number of thresholds is too small.
    #[error("{name} must be at least {min}. got {value}")]
    InvalidDimension {
        /// Name of the dimension.
        name: &'static str,
        /// Reported value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
    },

    /// The threshold increment is not positive.
    #[error("threshold increment must be positive. got {0}")]
    InvalidThresholdIncrement(i32),

    /// The last threshold of the ladder does not fit in `i32`.
    #[error(
        "threshold ladder (start {start}, increment {increment}, \
        count {count}) overflows i32"
    )]
    ThresholdOverflow {
        /// First threshold.
        start: i32,
        /// Step between thresholds.
        increment: i32,
        /// Number of thresholds.
        count: usize,
    },

    /// The acceptance probability is outside `[0, 1]`.
    #[error("accept fraction must be in [0, 1]. got {0}")]
    InvalidAcceptFraction(f64),

    /// A target class index is outside `[0, C)`.
    #[error("target of example {index} is {target}, expected a class in [0, {n_classes})")]
    TargetOutOfRange {
        /// Example index.
        index: usize,
        /// Offending target.
        target: usize,
        /// Number of classes.
        n_classes: usize,
    },

    /// The provider returned a buffer of the wrong length.
    #[error("expected {expected} values from the feature provider, got {got}")]
    BufferLength {
        /// Expected length (`N`).
        expected: usize,
        /// Returned length.
        got: usize,
    },

    /// A stored weak learner refers to a feature the provider does not have.
    #[error("weak learner uses feature {feature}, but there are only {n_features} features")]
    FeatureOutOfRange {
        /// Feature index stored in the weak learner.
        feature: usize,
        /// Number of features `D`.
        n_features: usize,
    },

    /// A stored weak learner was trained for another number of classes.
    #[error("weak learner has {got} class constants, expected {expected}")]
    ClassCountMismatch {
        /// Number of classes `C`.
        expected: usize,
        /// Length of the stored `k` vector or sharing set.
        got: usize,
    },

    /// A stored weak learner has infinite error (a failed round).
    #[error("cannot replay a weak learner with non-finite error")]
    NonFiniteLearner,

    /// Failed to write the training log.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}


/// A `Result` whose error type is [`JointBoostError`].
pub type Result<T> = std::result::Result<T, JointBoostError>;
