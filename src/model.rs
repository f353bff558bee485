//! The trained classifier: an ordered list of shared stumps.
use serde::{Serialize, Deserialize};

use crate::{
    FeatureProvider,
    WeakLearner,
};


/// The additive model built by boosting.
///
/// The confidence for class `c` on an example is the sum of
/// [`WeakLearner::confidence`] over the weak learners,
/// and the predicted class is the one with the largest confidence.
/// You can read/write this struct by `serde` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointBoostModel {
    n_classes: usize,
    learners: Vec<WeakLearner>,
}


impl JointBoostModel {
    /// Construct an empty model over `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Self { n_classes, learners: Vec::new(), }
    }

    /// Construct a model from the given weak learners.
    /// Panics if a learner has a different number of classes
    /// or is a sentinel.
    pub fn from_learners(n_classes: usize, learners: Vec<WeakLearner>)
        -> Self
    {
        let mut model = Self::new(n_classes);
        learners.into_iter().for_each(|wl| model.push(wl));
        model
    }

    /// Append a weak learner.
    /// Panics if it has a different number of classes or is a sentinel.
    pub fn push(&mut self, learner: WeakLearner) {
        assert!(learner.is_valid(), "cannot append a failed round");
        assert_eq!(
            learner.n_classes(), self.n_classes,
            "weak learner has {} classes, expected {}",
            learner.n_classes(), self.n_classes,
        );
        self.learners.push(learner);
    }

    /// The number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// The number of weak learners.
    #[inline]
    pub fn len(&self) -> usize {
        self.learners.len()
    }

    /// Returns `true` if the model has no weak learner.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.learners.is_empty()
    }

    /// The weak learners in the order they were found.
    #[inline]
    pub fn learners(&self) -> &[WeakLearner] {
        &self.learners[..]
    }

    /// Iterates over the weak learners.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, WeakLearner> {
        self.learners.iter()
    }

    /// The model made of the first `rounds` weak learners.
    pub fn truncated(&self, rounds: usize) -> Self {
        let rounds = rounds.min(self.len());
        Self {
            n_classes: self.n_classes,
            learners: self.learners[..rounds].to_vec(),
        }
    }

    /// Decompose the model into its weak learners.
    #[inline]
    pub fn into_learners(self) -> Vec<WeakLearner> {
        self.learners
    }

    /// The class confidences of a single example.
    /// `value(d)` returns the value of feature `d` on the example.
    pub fn confidence<F>(&self, mut value: F) -> Vec<f64>
        where F: FnMut(usize) -> i32
    {
        let mut confidence = vec![0f64; self.n_classes];
        for wl in &self.learners {
            let v = value(wl.d);
            confidence.iter_mut()
                .enumerate()
                .for_each(|(c, h)| *h += wl.confidence(v, c));
        }
        confidence
    }

    /// The class confidences of every example of `provider`,
    /// one row of `C` confidences per example.
    pub fn confidences<P>(&self, provider: &P) -> Vec<Vec<f64>>
        where P: FeatureProvider
    {
        let n_examples = provider.n_examples();
        let mut confidences = vec![vec![0f64; self.n_classes]; n_examples];
        let mut values = vec![0i32; n_examples];

        for wl in &self.learners {
            provider.feature_values(wl.d, &mut values);
            confidences.iter_mut()
                .zip(&values)
                .for_each(|(row, &v)| {
                    row.iter_mut()
                        .enumerate()
                        .for_each(|(c, h)| *h += wl.confidence(v, c));
                });
        }
        confidences
    }

    /// Predicts the class of every example of `provider`.
    /// Ties go to the smallest class index.
    pub fn predict_all<P>(&self, provider: &P) -> Vec<usize>
        where P: FeatureProvider
    {
        self.confidences(provider)
            .into_iter()
            .map(|row| argmax(&row))
            .collect()
    }

    /// The fraction of examples of `provider` whose target
    /// differs from the predicted class.
    pub fn training_error<P>(&self, provider: &P) -> f64
        where P: FeatureProvider
    {
        let n_examples = provider.n_examples();
        if n_examples == 0 { return 0f64; }

        let mistakes = self.predict_all(provider)
            .into_iter()
            .zip(provider.targets())
            .filter(|(p, y)| p != y)
            .count();
        mistakes as f64 / n_examples as f64
    }
}


impl<'a> IntoIterator for &'a JointBoostModel {
    type Item = &'a WeakLearner;
    type IntoIter = std::slice::Iter<'a, WeakLearner>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


fn argmax(row: &[f64]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (c, &h)| {
            if h > acc.1 { (c, h) } else { acc }
        })
        .0
}
