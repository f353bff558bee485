//! Provides [`JointBoost`] by Torralba, Murphy & Freeman, 2004,
//! in the per-pixel form used by TextonBoost (Shotton et al., 2006).
use colored::Colorize;
use rand::prelude::*;
use rayon::prelude::*;

use crate::{
    boost::{
        ClassStatistics,
        SharingSetOptimizer,
        ThresholdHistogram,
        WeakLearnerEvaluator,
    },
    common::{
        checker,
        constants::{
            DEFAULT_ROUNDS,
            DEFAULT_SEED,
            INITIAL_WEIGHT,
            PRINT_PRECISION,
            PRINT_WIDTH,
        },
        utils,
    },
    error::{JointBoostError, Result},
    research::RoundSummary,
    Booster,
    FeatureProvider,
    JointBoostModel,
    ThresholdLadder,
    WeakLearner,
};

use std::ops::ControlFlow;
use std::time::Instant;


/// The JointBoost algorithm.
///
/// Each round fits one decision stump that is shared by a subset of the
/// classes, chosen among all (sub-sampled) features, all thresholds and
/// a greedy family of sharing sets, by weighted squared error.
/// The per-example, per-class weights are then updated as in
/// AdaBoost.MH.
///
/// # Example
/// ```
/// use jointboost::prelude::*;
///
/// let provider = DenseFeatures::new(
///         vec![vec![0, 10, 20, 30]],
///         vec![0, 0, 1, 1],
///         2,
///     )
///     .thresholds(5, 10, 2);
///
/// let mut booster = JointBoost::init(provider)
///     .unwrap()
///     .seed(0)
///     .max_rounds(1);
///
/// let wl = booster.perform_round();
/// assert_eq!(wl.theta, 15);
///
/// // Or run several rounds and collect the model.
/// let model = booster.max_rounds(3).run();
/// assert!(model.len() > 0);
/// ```
pub struct JointBoost<P> {
    provider: P,

    n_examples: usize,
    n_features: usize,
    n_classes: usize,
    ladder: ThresholdLadder,
    accept_fraction: f64,

    // Class index of each example.
    targets: Vec<usize>,

    // Row-major `N x C` weights. Every entry stays positive.
    weights: Vec<f64>,

    // Feature sub-sampling.
    seed: u64,
    rng: StdRng,

    // Scratch space for the sequential path.
    stats: ClassStatistics,
    histogram: ThresholdHistogram,
    feature_values: Vec<i32>,

    // Weak learners whose update has been applied to `weights`.
    model: JointBoostModel,
    last: Option<WeakLearner>,

    round: usize,
    max_rounds: usize,
    parallel: bool,
    verbose: bool,
    negative_errors: usize,
}


impl<P: FeatureProvider> JointBoost<P> {
    /// Initialize [`JointBoost`] from a feature provider.
    ///
    /// This calls [`FeatureProvider::initialise`], validates the
    /// dimensions, the thresholds and the targets,
    /// and sets every weight to `1`.
    pub fn init(mut provider: P) -> Result<Self> {
        provider.initialise();

        let n_examples = provider.n_examples();
        let n_features = provider.n_features();
        let n_classes = provider.n_classes();
        checker::dimensions(n_examples, n_features, n_classes)?;

        let ladder = provider.thresholds();
        checker::ladder(&ladder)?;

        let accept_fraction = provider.accept_fraction();
        checker::provided_accept_fraction(accept_fraction)?;

        let targets = provider.targets();
        checker::buffer_length(n_examples, targets.len())?;
        checker::targets(&targets, n_classes)?;

        Ok(Self {
            provider,

            n_examples,
            n_features,
            n_classes,
            ladder,
            accept_fraction,

            targets,
            weights: vec![INITIAL_WEIGHT; n_examples * n_classes],

            seed: DEFAULT_SEED,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),

            stats: ClassStatistics::new(n_classes),
            histogram: ThresholdHistogram::new(ladder.len(), n_classes),
            feature_values: vec![0i32; n_examples],

            model: JointBoostModel::new(n_classes),
            last: None,

            round: 0,
            max_rounds: DEFAULT_ROUNDS,
            parallel: false,
            verbose: false,
            negative_errors: 0,
        })
    }


    /// Set the seed of the feature sub-sampling.
    /// Default value is `0`.
    /// This resets the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }


    /// Set the probability that a feature is examined in a round.
    /// By default, the value of the feature provider is used.
    pub fn accept_fraction(mut self, fraction: f64) -> Self {
        checker::accept_fraction(fraction);
        self.accept_fraction = fraction;
        self
    }


    /// Set the number of rounds [`Booster::run`] performs.
    /// Default value is `100`.
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }


    /// Evaluate the features of a round in parallel.
    /// The result does not depend on this setting.
    /// Default value is `false`.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }


    /// Print a line for each round.
    /// Default value is `false`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// The feature provider.
    #[inline]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The number of training examples `N`.
    #[inline]
    pub fn n_examples(&self) -> usize {
        self.n_examples
    }

    /// The number of candidate features `D`.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The number of classes `C`.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// The thresholds the stumps choose from.
    #[inline]
    pub fn thresholds(&self) -> &ThresholdLadder {
        &self.ladder
    }

    /// The targets read from the provider.
    #[inline]
    pub fn targets(&self) -> &[usize] {
        &self.targets[..]
    }

    /// The row-major `N x C` weight matrix.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights[..]
    }

    /// The weight of example `i` for class `c`.
    #[inline]
    pub fn weight(&self, i: usize, c: usize) -> f64 {
        self.weights[i * self.n_classes + c]
    }

    /// The number of rounds performed so far.
    #[inline]
    pub fn round(&self) -> usize {
        self.round
    }

    /// The weak learners applied to the weights so far,
    /// including the replayed ones.
    #[inline]
    pub fn model(&self) -> &JointBoostModel {
        &self.model
    }

    /// The number of thresholds rejected because their
    /// weighted squared error came out negative.
    #[inline]
    pub fn rejected_negative_errors(&self) -> usize {
        self.negative_errors
    }

    /// The statistics `p, t, k` of the current weights.
    pub fn class_statistics(&self) -> ClassStatistics {
        ClassStatistics::from_weights(
            &self.weights, &self.targets, self.n_classes
        )
    }


    /// Performs one round of boosting and returns the chosen weak learner.
    ///
    /// If no feature yields a valid stump, the returned weak learner has
    /// infinite error and the weights are left untouched.
    pub fn perform_round(&mut self) -> WeakLearner {
        let now = Instant::now();

        self.stats.compute(&self.weights, &self.targets);

        // Draw the sub-sample first so that the random sequence
        // does not depend on how the features are evaluated.
        let fraction = self.accept_fraction;
        let accepted = (0..self.n_features)
            .filter(|_| self.rng.gen::<f64>() < fraction)
            .collect::<Vec<usize>>();

        let mut minimum = if self.parallel {
            self.evaluate_parallel(&accepted)
        } else {
            self.evaluate_sequential(&accepted)
        };

        if minimum.is_valid() {
            self.update_weights(&minimum);
        }

        // The stored learner carries the time of the whole round.
        minimum.time_taken = now.elapsed().as_secs_f64() * 1_000f64;
        if minimum.is_valid() {
            self.model.push(minimum.clone());
        }
        self.round += 1;

        if self.verbose {
            self.print_round(&minimum, accepted.len());
        }

        self.last = Some(minimum.clone());
        minimum
    }


    /// Replays the weight updates of weak learners found earlier,
    /// e.g., to resume boosting from a saved model.
    /// No search is performed and the random sequence is not advanced.
    ///
    /// The learners are validated before any weight changes.
    pub fn continue_from(&mut self, learners: &[WeakLearner]) -> Result<()> {
        for wl in learners {
            if !wl.is_valid() {
                return Err(JointBoostError::NonFiniteLearner);
            }
            if wl.d >= self.n_features {
                return Err(JointBoostError::FeatureOutOfRange {
                    feature: wl.d,
                    n_features: self.n_features,
                });
            }
            if wl.k.len() != self.n_classes {
                return Err(JointBoostError::ClassCountMismatch {
                    expected: self.n_classes,
                    got: wl.k.len(),
                });
            }
            if wl.n.n_classes() != self.n_classes {
                return Err(JointBoostError::ClassCountMismatch {
                    expected: self.n_classes,
                    got: wl.n.n_classes(),
                });
            }
        }

        for wl in learners {
            self.update_weights(wl);
            self.model.push(wl.clone());
        }
        Ok(())
    }


    // Evaluates the accepted features one after another,
    // reusing the scratch buffers of `self`.
    fn evaluate_sequential(&mut self, accepted: &[usize]) -> WeakLearner {
        let mut minimum = WeakLearner::sentinel(self.n_classes);
        let optimizer = SharingSetOptimizer::new(self.n_classes);

        for &d in accepted {
            self.provider.feature_values(d, &mut self.feature_values);
            self.histogram.accumulate(
                &self.ladder,
                &self.feature_values,
                &self.targets,
                &self.weights,
            );

            let mut evaluator = WeakLearnerEvaluator::new(
                &self.stats, &self.histogram, &self.ladder
            );
            let candidate = optimizer.optimise(&mut evaluator);
            self.negative_errors += evaluator.negative_errors();

            if candidate.error < minimum.error {
                minimum = candidate;
                minimum.d = d;
            }
        }
        minimum
    }


    // Evaluates the accepted features on the rayon pool.
    // Each worker owns its buffers; the reduction keeps feature order,
    // so ties go to the lowest feature index as in the sequential path.
    fn evaluate_parallel(&mut self, accepted: &[usize]) -> WeakLearner {
        let n_examples = self.n_examples;
        let n_classes = self.n_classes;
        let provider = &self.provider;
        let ladder = &self.ladder;
        let targets = &self.targets[..];
        let weights = &self.weights[..];
        let stats = &self.stats;
        let optimizer = SharingSetOptimizer::new(n_classes);

        let candidates = accepted.par_iter()
            .map_init(
                || {
                    let values = vec![0i32; n_examples];
                    let hist = ThresholdHistogram::new(ladder.len(), n_classes);
                    (values, hist)
                },
                |(values, hist), &d| {
                    provider.feature_values(d, values);
                    hist.accumulate(ladder, values, targets, weights);

                    let mut evaluator = WeakLearnerEvaluator::new(
                        stats, hist, ladder
                    );
                    let mut candidate = optimizer.optimise(&mut evaluator);
                    candidate.d = d;
                    (candidate, evaluator.negative_errors())
                }
            )
            .collect::<Vec<_>>();

        let mut minimum = WeakLearner::sentinel(n_classes);
        for (candidate, negatives) in candidates {
            self.negative_errors += negatives;
            if candidate.error < minimum.error {
                minimum = candidate;
            }
        }
        minimum
    }


    // w[i][c] <- w[i][c] exp(- z[i][c] h(i, c))
    fn update_weights(&mut self, wl: &WeakLearner) {
        self.provider.feature_values(wl.d, &mut self.feature_values);

        self.weights.par_chunks_mut(self.n_classes)
            .zip(self.feature_values.par_iter())
            .zip(self.targets.par_iter())
            .for_each(|((row, &value), &y)| {
                let shared = wl.shared_confidence(value);
                for (c, w) in row.iter_mut().enumerate() {
                    let h = if wl.n.contains(c) { shared } else { wl.k[c] };
                    *w *= (- utils::sign(y, c) * h).exp();
                }
            });

        debug_assert!(
            self.weights.iter().all(|&w| w > 0f64),
            "a weight became non-positive after round {}", self.round
        );
    }


    fn print_round(&self, wl: &WeakLearner, n_accepted: usize) {
        if !wl.is_valid() {
            println!(
                "{} {}\t{}",
                "[NO ]".bold().bright_red(),
                format!("{:>PRINT_WIDTH$}", self.round).red(),
                format!(
                    "no valid weak learner among {n_accepted} features"
                ).yellow(),
            );
            return;
        }
        println!(
            "{} {}\t{}\t{}\t{}\t{}\t{}",
            "[RND]".bold().magenta(),
            format!("{:>PRINT_WIDTH$}", self.round).red(),
            format!("d={:>PRINT_WIDTH$}", wl.d).blue(),
            format!("theta={:>5}", wl.theta).blue(),
            format!("{}", wl.n).green(),
            format!("{:>PRINT_WIDTH$.PRINT_PRECISION$}", wl.error).yellow(),
            utils::time_format(wl.time_taken as u128).cyan(),
        );
    }
}


impl<P: FeatureProvider> Booster for JointBoost<P> {
    type Output = JointBoostModel;


    fn name(&self) -> &str {
        "JointBoost"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let info = Vec::from([
            ("# of examples", format!("{}", self.n_examples)),
            ("# of features", format!("{}", self.n_features)),
            ("# of classes", format!("{}", self.n_classes)),
            (
                "Thresholds",
                format!(
                    "{} x {} from {}",
                    self.ladder.len(),
                    self.ladder.increment(),
                    self.ladder.start(),
                ),
            ),
            ("Accept fraction", format!("{}", self.accept_fraction)),
            ("Seed", format!("{}", self.seed)),
            ("Max rounds", format!("{}", self.max_rounds)),
            ("Parallel", format!("{}", self.parallel)),
        ]);
        Some(info)
    }


    fn preprocess(&mut self) {
        self.last = None;
    }


    fn boost(&mut self, iteration: usize) -> ControlFlow<usize> {
        if self.max_rounds < iteration {
            return ControlFlow::Break(self.max_rounds);
        }

        let wl = self.perform_round();

        // With every feature examined, the next round would see
        // exactly the same weights and features.
        if !wl.is_valid() && self.accept_fraction >= 1f64 {
            return ControlFlow::Break(iteration);
        }

        ControlFlow::Continue(())
    }


    fn postprocess(&mut self) -> Self::Output {
        self.model.clone()
    }
}


impl<P: FeatureProvider> RoundSummary for JointBoost<P> {
    fn rounds(&self) -> usize {
        self.round
    }


    fn last_learner(&self) -> Option<&WeakLearner> {
        self.last.as_ref()
    }


    fn exponential_loss(&self) -> f64 {
        utils::exponential_loss(&self.weights)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::DenseFeatures;

    fn provider(n_features: usize) -> DenseFeatures {
        let targets = vec![0, 1, 2, 0, 1, 2, 0, 1];
        let values = (0..n_features)
            .map(|d| {
                (0..targets.len())
                    .map(|i| ((i * 7 + d * 3) % 11) as i32)
                    .collect()
            })
            .collect();
        DenseFeatures::new(values, targets, 3).thresholds(0, 2, 5)
    }

    #[test]
    fn test_init_sets_unit_weights() {
        let booster = JointBoost::init(provider(4)).unwrap();
        assert_eq!(booster.weights().len(), 8 * 3);
        assert!(booster.weights().iter().all(|&w| w == INITIAL_WEIGHT));
        assert_eq!(booster.exponential_loss(), 24.0);
        assert!(booster.last_learner().is_none());
    }

    #[test]
    fn test_verbose_round() {
        let mut booster = JointBoost::init(provider(4))
            .unwrap()
            .verbose(true);
        let wl = booster.perform_round();
        assert!(wl.is_valid());
        assert!(wl.time_taken >= 0.0);
        assert!(booster.last_learner().unwrap().same_rule(&wl));
    }

    #[test]
    fn test_seed_controls_subsample() {
        let rounds = |seed: u64| {
            let mut booster = JointBoost::init(provider(40))
                .unwrap()
                .accept_fraction(0.3)
                .seed(seed);
            (0..5).map(|_| booster.perform_round().d).collect::<Vec<_>>()
        };
        assert_eq!(rounds(9), rounds(9));
    }

    #[test]
    fn test_info() {
        let booster = JointBoost::init(provider(2)).unwrap();
        assert_eq!(booster.name(), "JointBoost");
        let info = booster.info().unwrap();
        assert!(info.iter().any(|(key, val)| *key == "# of classes" && val == "3"));
    }
}
