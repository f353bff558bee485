//! Per-class statistics that do not depend on the feature.
use crate::common::utils::sign;


/// The vectors `p, t, k` of a round.
///
/// - `p[c] = Σ_i w[i][c]`, the weight mass of class `c`,
/// - `t[c] = Σ_i w[i][c] z[i][c]`, the signed weight mass,
/// - `k[c] = t[c] / p[c]`, the best constant confidence for `c`.
///
/// `k[c]` is defined as `0` when `p[c] == 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStatistics {
    /// Weight mass per class.
    pub p: Vec<f64>,
    /// Signed weight mass per class.
    pub t: Vec<f64>,
    /// Optimal constant confidence per class.
    pub k: Vec<f64>,
}


impl ClassStatistics {
    /// Construct zero statistics for `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Self {
            p: vec![0f64; n_classes],
            t: vec![0f64; n_classes],
            k: vec![0f64; n_classes],
        }
    }

    /// Compute the statistics from scratch.
    /// `weights` is the row-major `N x C` weight matrix.
    pub fn from_weights(weights: &[f64], targets: &[usize], n_classes: usize)
        -> Self
    {
        let mut stats = Self::new(n_classes);
        stats.compute(weights, targets);
        stats
    }

    /// The number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.p.len()
    }

    /// Recompute the statistics in place.
    pub fn compute(&mut self, weights: &[f64], targets: &[usize]) {
        let n_classes = self.n_classes();
        debug_assert_eq!(weights.len(), targets.len() * n_classes);

        self.p.iter_mut().for_each(|p| *p = 0f64);
        self.t.iter_mut().for_each(|t| *t = 0f64);

        for (row, &y) in weights.chunks_exact(n_classes).zip(targets) {
            for (c, &w) in row.iter().enumerate() {
                self.p[c] += w;
                self.t[c] += w * sign(y, c);
            }
        }

        self.k.iter_mut()
            .zip(self.p.iter().zip(&self.t))
            .for_each(|(k, (&p, &t))| {
                *k = if p == 0f64 { 0f64 } else { t / p };
            });
    }

    /// The weighted squared error of class `c`
    /// when it only uses its constant `k[c]`:
    /// `p[c] - 2 k[c] t[c] + k[c]^2 p[c]`.
    #[inline(always)]
    pub fn constant_error(&self, c: usize) -> f64 {
        let (p, t, k) = (self.p[c], self.t[c], self.k[c]);
        p - 2f64 * k * t + k * k * p
    }

    /// The error of the stump that shares nothing,
    /// i.e., every class uses its constant.
    pub fn baseline_error(&self) -> f64 {
        (0..self.n_classes())
            .map(|c| self.constant_error(c))
            .sum::<f64>()
    }
}
