//! Greedy forward search over sharing sets.
//!
//! The search follows Torralba, Murphy and Freeman,
//! "Sharing visual features for multiclass and multiview object detection":
//! instead of fitting all `2^C` subsets, the sharing set grows by one class
//! at a time, keeping the class that lowers the error most.
//! This takes `O(C^2)` calls to the evaluator.
use crate::{
    boost::WeakLearnerEvaluator,
    common::utils::argmin_finite,
    SharingSet,
    WeakLearner,
};


/// The trace of one greedy search.
///
/// Index `s` corresponds to sharing sets of size `s + 1`.
#[derive(Debug, Clone)]
pub struct SharingSearch {
    /// `masks[s]` is the base set that step `s + 1` grows from.
    pub masks: Vec<SharingSet>,
    /// `learners[s]` is the best stump found at step `s`.
    /// Its error is infinite if every candidate of that step failed.
    pub learners: Vec<WeakLearner>,
}


impl SharingSearch {
    /// Returns the stump with the lowest error over all steps.
    /// Ties go to the smaller sharing set.
    /// Returns a sentinel if no step found a valid stump.
    pub fn best(self) -> WeakLearner {
        let errors = self.learners.iter()
            .map(|wl| wl.error)
            .collect::<Vec<_>>();
        let n_classes = self.masks.first()
            .map(|mask| mask.n_classes())
            .unwrap_or(0);

        match argmin_finite(&errors) {
            Some(ix) => self.learners.into_iter().nth(ix)
                .unwrap_or_else(|| WeakLearner::sentinel(n_classes)),
            None => WeakLearner::sentinel(n_classes),
        }
    }
}


/// Searches the sharing set of a single feature.
///
/// Sharing sets of size `1, 2, ..., C - 1` are examined.
/// The empty set (only the constants `k`) is not a candidate.
#[derive(Debug, Clone, Copy)]
pub struct SharingSetOptimizer {
    n_classes: usize,
}


impl SharingSetOptimizer {
    /// Construct a new optimizer over `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Self { n_classes }
    }

    /// Run the greedy search and keep its trace.
    ///
    /// At step `s` (sets of size `s`), every class not in the current
    /// base set is added in turn and the candidate with the lowest
    /// positive error becomes the next base set.
    /// If no candidate of a step is valid, the base set stays as it is.
    pub fn search(&self, evaluator: &mut WeakLearnerEvaluator<'_>)
        -> SharingSearch
    {
        let n_steps = self.n_classes.saturating_sub(1);
        let mut masks = Vec::with_capacity(n_steps);
        let mut learners = Vec::with_capacity(n_steps);

        let mut mask = SharingSet::empty(self.n_classes);
        for _ in 0..n_steps {
            let mut best = WeakLearner::sentinel(self.n_classes);

            for class in 0..self.n_classes {
                if mask.contains(class) { continue; }

                let candidate = evaluator.evaluate(&mask.with(class));
                if candidate.error > 0f64 && candidate.error < best.error {
                    best = candidate;
                }
            }

            if best.is_valid() {
                mask = best.n.clone();
            }
            masks.push(mask.clone());
            learners.push(best);
        }

        SharingSearch { masks, learners }
    }

    /// Run the greedy search and return the best stump.
    #[inline]
    pub fn optimise(&self, evaluator: &mut WeakLearnerEvaluator<'_>)
        -> WeakLearner
    {
        self.search(evaluator).best()
    }
}
