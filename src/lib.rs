#![warn(missing_docs)]

//!
//! A crate that trains a multiclass classifier by JointBoost.
//!
//! JointBoost (Torralba, Murphy & Freeman, 2004) is a multiclass
//! boosting algorithm in the AdaBoost.MH family.
//! Each round adds one decision stump on a single integer feature,
//! and the stump is **shared** by a subset of the classes:
//!
//! - the classes in the sharing set output `a + b` above the threshold
//!   and `b` below it,
//! - every other class outputs its own constant `k[c]`.
//!
//! A round examines every (sub-sampled) feature, every threshold and a
//! greedy family of sharing sets, keeps the stump of least weighted
//! squared error and re-weights the examples.
//! Cumulative histograms make the scan over thresholds `O(N C + Θ C)`
//! per feature, and the greedy search examines `O(C^2)` sharing sets
//! instead of `2^C`.
//!
//! Features are computed by the caller through [`FeatureProvider`].
//!
//! ```
//! use jointboost::prelude::*;
//!
//! // Two features on six examples of three classes.
//! let provider = DenseFeatures::new(
//!         vec![
//!             vec![0, 1, 5, 6, 9, 9],
//!             vec![9, 8, 1, 0, 8, 9],
//!         ],
//!         vec![0, 0, 1, 1, 2, 2],
//!         3,
//!     )
//!     .thresholds(0, 1, 10);
//!
//! let mut booster = JointBoost::init(provider)
//!     .unwrap()
//!     .max_rounds(5);
//! let model = booster.run();
//! let predictions = model.predict_all(booster.provider());
//! assert_eq!(predictions.len(), 6);
//! ```

pub mod common;
pub mod error;
pub mod provider;
pub mod sharing_set;
pub mod weak_learner;
pub mod boost;
pub mod booster;
pub mod model;
pub mod research;
pub mod prelude;


pub use error::{JointBoostError, Result};
pub use provider::{
    DenseFeatures,
    FeatureProvider,
    ThresholdLadder,
};
pub use sharing_set::SharingSet;
pub use weak_learner::WeakLearner;
pub use boost::JointBoost;
pub use booster::Booster;
pub use model::JointBoostModel;
pub use research::{Logger, RoundSummary};
