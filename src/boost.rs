//! The JointBoost optimizer.
//!
//! One round of boosting flows through the submodules as follows:
//! the per-class statistics `p, t, k` are computed once per round
//! ([`statistics`]), the cumulative histograms `q, u` once per feature
//! ([`histogram`]), and the greedy search over sharing sets
//! ([`sharing`]) calls the closed-form stump fit ([`evaluator`])
//! `O(C^2)` times per feature.

pub mod statistics;
pub mod histogram;
pub mod evaluator;
pub mod sharing;
pub(crate) mod jointboost;

pub use statistics::ClassStatistics;
pub use histogram::ThresholdHistogram;
pub use evaluator::{
    WeakLearnerEvaluator,
    solve_confidences,
};
pub use sharing::{
    SharingSetOptimizer,
    SharingSearch,
};
pub use jointboost::JointBoost;
