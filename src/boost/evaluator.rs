//! Fits a shared stump for a fixed sharing set.
use crate::{
    boost::{ClassStatistics, ThresholdHistogram},
    common::constants::SOLVE_TOLERANCE,
    SharingSet,
    ThresholdLadder,
    WeakLearner,
};


/// Solves the normal equations of the weighted least squares fit
/// for the shared confidences `(a, b)`:
/// ```txt
/// b = (T - U) / (P - Q),
/// a = U / Q - b.
/// ```
/// Returns `None` if `|Q|` or `|P - Q|` is below [`SOLVE_TOLERANCE`],
/// i.e., (almost) no weight lies on one side of the threshold.
#[inline(always)]
pub fn solve_confidences(p: f64, q: f64, t: f64, u: f64)
    -> Option<(f64, f64)>
{
    let pq = p - q;
    let tu = t - u;

    if q.abs() < SOLVE_TOLERANCE || pq.abs() < SOLVE_TOLERANCE {
        return None;
    }

    let b = tu / pq;
    let a = u / q - b;
    Some((a, b))
}


/// Evaluates sharing sets for one feature.
///
/// The evaluator borrows the round statistics and the feature histogram,
/// and counts the thresholds whose error came out negative.
/// Such thresholds are numerically broken and never selected.
pub struct WeakLearnerEvaluator<'a> {
    stats: &'a ClassStatistics,
    histogram: &'a ThresholdHistogram,
    ladder: &'a ThresholdLadder,
    negative_errors: usize,
}


impl<'a> WeakLearnerEvaluator<'a> {
    /// Construct a new evaluator.
    pub fn new(
        stats: &'a ClassStatistics,
        histogram: &'a ThresholdHistogram,
        ladder: &'a ThresholdLadder,
    ) -> Self
    {
        debug_assert_eq!(stats.n_classes(), histogram.n_classes());
        debug_assert_eq!(ladder.len(), histogram.n_thetas());
        Self { stats, histogram, ladder, negative_errors: 0, }
    }

    /// The number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.stats.n_classes()
    }

    /// The number of thresholds rejected so far
    /// because of a negative error.
    #[inline]
    pub fn negative_errors(&self) -> usize {
        self.negative_errors
    }

    /// Returns the best stump for the sharing set `n` over all thresholds.
    ///
    /// The feature index of the result is left as `0`;
    /// the caller knows which feature the histogram was built from.
    /// The error is `f64::INFINITY` if every threshold is degenerate.
    pub fn evaluate(&mut self, n: &SharingSet) -> WeakLearner {
        let stats = self.stats;
        let hist = self.histogram;
        let n_classes = self.n_classes();

        let mut best = WeakLearner::sentinel(n_classes);
        best.n = n.clone();

        // The classes outside of `n` do not depend on the threshold.
        let (mut p, mut t) = (0f64, 0f64);
        let mut constant_error = 0f64;
        for c in 0..n_classes {
            if n.contains(c) {
                p += stats.p[c];
                t += stats.t[c];
            } else {
                constant_error += stats.constant_error(c);
            }
        }

        for t_ix in 0..hist.n_thetas() {
            let (mut q, mut u) = (0f64, 0f64);
            for c in n.classes() {
                q += hist.q(t_ix, c);
                u += hist.u(t_ix, c);
            }

            let Some((a, b)) = solve_confidences(p, q, t, u) else {
                continue;
            };

            let shared_error = n.classes()
                .map(|c| {
                    let (pc, tc) = (stats.p[c], stats.t[c]);
                    let (qc, uc) = (hist.q(t_ix, c), hist.u(t_ix, c));
                    pc - 2f64 * a * uc - 2f64 * b * tc
                        + a * a * qc + b * b * pc
                        + 2f64 * a * b * qc
                })
                .sum::<f64>();
            let error = shared_error + constant_error;

            if error < 0f64 {
                self.negative_errors += 1;
                continue;
            }

            if error < best.error {
                best.error = error;
                best.theta = self.ladder.theta(t_ix);
                best.a = a;
                best.b = b;
            }
        }

        if best.is_valid() {
            for c in 0..n_classes {
                best.k[c] = if n.contains(c) { 0f64 } else { stats.k[c] };
            }
        }
        best
    }
}
