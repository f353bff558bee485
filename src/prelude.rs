//! Exports the standard boosting algorithm and traits.
//!
pub use crate::booster::Booster;

pub use crate::boost::JointBoost;

pub use crate::provider::{
    DenseFeatures,
    FeatureProvider,
    ThresholdLadder,
};

pub use crate::{
    JointBoostModel,
    SharingSet,
    WeakLearner,
};

pub use crate::error::{
    JointBoostError,
    Result,
};

pub use crate::research::{
    Logger,
    RoundSummary,
};
