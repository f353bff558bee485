//! This directory provides some features for research.
//! Measure the followings of boosting algorithm per round
//! - Chosen weak learner
//! - Exponential loss
//! - Running time

/// Defines a logger that runs a booster round by round.
pub mod logger;

pub use logger::{
    Logger,
    RoundSummary,
};
