use jointboost::prelude::*;
use jointboost::boost::ClassStatistics;
use rand::prelude::*;
use approx::assert_abs_diff_eq;


/// Random problem whose first few features carry the label.
fn random_provider(seed: u64, n_features: usize, n_classes: usize)
    -> DenseFeatures
{
    let mut rng = StdRng::seed_from_u64(seed);
    let n_examples = 120;
    let targets = (0..n_examples)
        .map(|_| rng.gen_range(0..n_classes))
        .collect::<Vec<usize>>();
    let values = (0..n_features)
        .map(|d| {
            targets.iter()
                .map(|&y| {
                    let noise = rng.gen_range(0..8);
                    if d % n_classes == y && d < 2 * n_classes {
                        noise + 6
                    } else {
                        noise
                    }
                })
                .collect::<Vec<i32>>()
        })
        .collect::<Vec<_>>();

    DenseFeatures::new(values, targets, n_classes)
        .thresholds(0, 1, 14)
}


fn separable() -> DenseFeatures {
    DenseFeatures::new(vec![vec![0, 10, 20, 30]], vec![0, 0, 1, 1], 2)
        .thresholds(5, 10, 2)
}


/// Tests for `JointBoost`.
#[cfg(test)]
pub mod jointboost_tests {
    use super::*;

    #[test]
    fn separable_first_round() {
        let mut booster = JointBoost::init(separable()).unwrap();
        let wl = booster.perform_round();
        println!("{wl}");

        assert_eq!(wl.d, 0);
        assert_eq!(wl.theta, 15);
        // With two classes, sharing sets hold a single class.
        // Both classes are split equally well; the first one wins.
        assert_eq!(wl.n, SharingSet::from_classes(2, [0]));
        assert_abs_diff_eq!(wl.a, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wl.b, 1.0, epsilon = 1e-12);
        assert_eq!(wl.k, vec![0.0, 0.0]);
        assert_abs_diff_eq!(wl.error, 4.0, epsilon = 1e-12);

        // Every example is classified correctly for the shared class,
        // so its weights shrink. The other class uses `k = 0`.
        let shrunk = (-1f64).exp();
        for i in 0..4 {
            assert_abs_diff_eq!(booster.weight(i, 0), shrunk, epsilon = 1e-12);
            assert!(booster.weight(i, 0) < 1.0);
            assert_eq!(booster.weight(i, 1), 1.0);
        }
        assert!(booster.weights().iter().all(|&w| w <= 1.0));
        assert_eq!(booster.model().len(), 1);
        assert_eq!(booster.round(), 1);

        // The model keeps the learner exactly as returned, time included.
        let stored = &booster.model().learners()[0];
        assert_eq!(stored.time_taken, wl.time_taken);
        assert!(stored.same_rule(&wl));
    }

    #[test]
    fn separable_model_classifies() {
        let mut booster = JointBoost::init(separable())
            .unwrap()
            .max_rounds(4);
        let model = booster.run();

        assert_eq!(model.training_error(booster.provider()), 0.0);
        assert_eq!(model.predict_all(booster.provider()), vec![0, 0, 1, 1]);
    }

    #[test]
    fn loss_never_increases() {
        for seed in 0..5 {
            let provider = random_provider(seed, 12, 4);
            let mut booster = JointBoost::init(provider)
                .unwrap()
                .seed(seed)
                .accept_fraction(0.7);

            let mut loss = booster.exponential_loss();
            for _ in 0..25 {
                let baseline = booster.class_statistics().p.iter().sum::<f64>();
                let wl = booster.perform_round();
                let next = booster.exponential_loss();

                if wl.is_valid() {
                    assert!(
                        next <= loss * (1.0 + 1e-12),
                        "loss increased from {loss} to {next}"
                    );
                    if wl.error < baseline * (1.0 - 1e-9) {
                        assert!(next < loss, "{next} is not below {loss}");
                    }
                } else {
                    assert_eq!(next, loss);
                }
                assert!(booster.weights().iter().all(|&w| w > 0.0));
                loss = next;
            }
            assert_eq!(booster.rejected_negative_errors(), 0);
        }
    }

    #[test]
    fn error_matches_weighted_squared_error() {
        let provider = random_provider(11, 6, 3);
        let mut booster = JointBoost::init(provider).unwrap();

        for _ in 0..5 {
            let before = booster.weights().to_vec();
            let wl = booster.perform_round();
            assert!(wl.is_valid());

            let column = booster.provider().column(wl.d);
            let targets = booster.targets();
            let mut error = 0.0;
            for (i, (&v, &y)) in column.iter().zip(targets).enumerate() {
                for c in 0..3 {
                    let z = if y == c { 1.0 } else { -1.0 };
                    let r = z - wl.confidence(v, c);
                    error += before[i * 3 + c] * r * r;
                }
            }
            assert_abs_diff_eq!(wl.error, error, epsilon = 1e-8);
        }
    }

    #[test]
    fn same_seed_same_learners() {
        let train = |parallel: bool| {
            let mut booster = JointBoost::init(random_provider(3, 30, 5))
                .unwrap()
                .seed(42)
                .accept_fraction(0.5)
                .parallel(parallel);
            (0..15).map(|_| booster.perform_round()).collect::<Vec<_>>()
        };

        let first = train(false);
        let second = train(false);
        let parallel = train(true);
        for ((a, b), c) in first.iter().zip(&second).zip(&parallel) {
            assert!(a.same_rule(b), "{a} != {b}");
            assert!(a.same_rule(c), "{a} != {c}");
        }
    }

    #[test]
    fn lowest_feature_wins_ties() {
        let column = vec![0, 10, 20, 30];
        let provider = DenseFeatures::new(
                vec![vec![3; 4], column.clone(), column],
                vec![0, 0, 1, 1],
                2,
            )
            .thresholds(5, 10, 2);
        let mut booster = JointBoost::init(provider).unwrap();
        assert_eq!(booster.perform_round().d, 1);
    }

    #[test]
    fn constant_feature_yields_sentinel() {
        let provider = DenseFeatures::new(
                vec![vec![7; 6]],
                vec![0, 1, 2, 0, 1, 2],
                3,
            )
            .thresholds(0, 3, 5);
        let mut booster = JointBoost::init(provider).unwrap();

        let wl = booster.perform_round();
        assert!(!wl.is_valid());
        assert_eq!(wl.error, f64::INFINITY);
        assert!(booster.weights().iter().all(|&w| w == 1.0));
        assert!(booster.model().is_empty());

        // Every feature is examined, so `run` stops right away.
        let mut booster = booster.max_rounds(10);
        let model = booster.run();
        assert!(model.is_empty());
        assert_eq!(booster.round(), 2);
    }

    #[test]
    fn nothing_accepted() {
        let mut booster = JointBoost::init(random_provider(0, 8, 3))
            .unwrap()
            .accept_fraction(0.0)
            .max_rounds(3);
        let model = booster.run();

        assert!(model.is_empty());
        assert_eq!(booster.round(), 3);
        assert!(booster.weights().iter().all(|&w| w == 1.0));
    }

    #[test]
    fn continue_from_replays_weights() {
        let mut booster = JointBoost::init(random_provider(5, 10, 4))
            .unwrap()
            .max_rounds(8);
        let model = booster.run();
        assert_eq!(model.len(), 8);

        let mut resumed = JointBoost::init(random_provider(5, 10, 4)).unwrap();
        resumed.continue_from(model.learners()).unwrap();

        assert_eq!(resumed.weights(), booster.weights());
        assert_eq!(resumed.model().len(), 8);
        assert_eq!(resumed.round(), 0);
    }

    #[test]
    fn continue_from_rejects_foreign_learners() {
        let mut booster = JointBoost::init(separable()).unwrap();
        let wl = booster.perform_round();
        let weights = booster.weights().to_vec();

        let mut wrong_feature = wl.clone();
        wrong_feature.d = 3;
        let err = booster.continue_from(&[wl.clone(), wrong_feature]);
        assert!(matches!(
            err, Err(JointBoostError::FeatureOutOfRange { feature: 3, .. })
        ));

        let mut wrong_classes = wl.clone();
        wrong_classes.k = vec![0.0; 3];
        let err = booster.continue_from(&[wrong_classes]);
        assert!(matches!(
            err, Err(JointBoostError::ClassCountMismatch { .. })
        ));

        let err = booster.continue_from(&[WeakLearner::sentinel(2)]);
        assert!(matches!(err, Err(JointBoostError::NonFiniteLearner)));

        // Nothing was applied.
        assert_eq!(booster.weights(), &weights[..]);
    }

    #[test]
    fn round_statistics_follow_weights() {
        let mut booster = JointBoost::init(random_provider(8, 6, 3)).unwrap();
        booster.perform_round();

        let stats = booster.class_statistics();
        let expected = ClassStatistics::from_weights(
            booster.weights(), booster.targets(), 3
        );
        assert_eq!(stats, expected);
        assert_abs_diff_eq!(
            stats.p.iter().sum::<f64>(),
            booster.exponential_loss(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn model_serializes() {
        let mut booster = JointBoost::init(random_provider(2, 6, 3))
            .unwrap()
            .max_rounds(3);
        let model = booster.run();
        assert!(model.iter().all(|wl| wl.time_taken > 0.0));

        let json = serde_json::to_string(&model).unwrap();
        let restored: JointBoostModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), model.len());
        assert_eq!(restored.n_classes(), 3);
        for (a, b) in restored.iter().zip(&model) {
            assert_eq!(a.d, b.d);
            assert_eq!(a.theta, b.theta);
            assert_eq!(a.n, b.n);
            assert_abs_diff_eq!(a.a, b.a, epsilon = 1e-12);
            assert_abs_diff_eq!(a.b, b.b, epsilon = 1e-12);
            assert_abs_diff_eq!(a.error, b.error, epsilon = 1e-9);
            assert_abs_diff_eq!(a.time_taken, b.time_taken, epsilon = 1e-9);
            for (x, y) in a.k.iter().zip(&b.k) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
        }
    }
}


/// Configuration errors.
#[cfg(test)]
pub mod configuration_tests {
    use super::*;

    struct ShortTargets;

    impl FeatureProvider for ShortTargets {
        fn n_examples(&self) -> usize { 3 }
        fn n_features(&self) -> usize { 1 }
        fn n_classes(&self) -> usize { 2 }
        fn thresholds(&self) -> ThresholdLadder {
            ThresholdLadder::new(0, 1, 2)
        }
        fn targets(&self) -> Vec<usize> { vec![0, 1] }
        fn feature_values(&self, _feature: usize, values: &mut [i32]) {
            values.iter_mut().for_each(|v| *v = 0);
        }
    }

    #[test]
    fn target_out_of_range() {
        let provider = DenseFeatures::new(vec![vec![0, 1]], vec![0, 2], 2);
        let err = JointBoost::init(provider).err().unwrap();
        assert!(matches!(
            err, JointBoostError::TargetOutOfRange { index: 1, target: 2, .. }
        ));
    }

    #[test]
    fn single_class() {
        let provider = DenseFeatures::new(vec![vec![0, 1]], vec![0, 0], 1);
        assert!(JointBoost::init(provider).is_err());
    }

    #[test]
    fn no_features() {
        let provider = DenseFeatures::new(vec![], vec![0, 1], 2);
        assert!(JointBoost::init(provider).is_err());
    }

    #[test]
    fn bad_thresholds() {
        let provider = DenseFeatures::new(vec![vec![0, 1]], vec![0, 1], 2);
        assert!(JointBoost::init(provider.clone().thresholds(0, 1, 0)).is_err());
        assert!(JointBoost::init(provider.thresholds(0, 0, 4)).is_err());
    }

    #[test]
    fn bad_accept_fraction() {
        let provider = DenseFeatures::new(vec![vec![0, 1]], vec![0, 1], 2)
            .accept_fraction(1.5);
        let err = JointBoost::init(provider).err().unwrap();
        assert!(matches!(err, JointBoostError::InvalidAcceptFraction(_)));
    }

    #[test]
    #[should_panic]
    fn bad_accept_fraction_override() {
        let provider = DenseFeatures::new(vec![vec![0, 1]], vec![0, 1], 2);
        let _ = JointBoost::init(provider).unwrap().accept_fraction(-0.1);
    }

    #[test]
    fn short_targets() {
        let err = JointBoost::init(ShortTargets).err().unwrap();
        assert!(matches!(
            err, JointBoostError::BufferLength { expected: 3, got: 2 }
        ));
    }
}
