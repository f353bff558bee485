//! Cumulative per-threshold, per-class sums for one feature.
use crate::{
    common::utils::sign,
    ThresholdLadder,
};


/// The matrices `q` and `u` of a feature, both `Θ x C`.
///
/// After [`ThresholdHistogram::accumulate`],
/// - `q(t, c)` is the total weight for class `c`
///   of the examples whose feature value is greater than `theta[t]`,
/// - `u(t, c)` is the signed total of the same examples.
///
/// The histogram owns its buffers and clears them on each accumulation,
/// so one instance is reused for every feature of a round.
#[derive(Debug, Clone)]
pub struct ThresholdHistogram {
    n_thetas: usize,
    n_classes: usize,
    q: Vec<f64>,
    u: Vec<f64>,
}


impl ThresholdHistogram {
    /// Construct an empty histogram.
    pub fn new(n_thetas: usize, n_classes: usize) -> Self {
        Self {
            n_thetas,
            n_classes,
            q: vec![0f64; n_thetas * n_classes],
            u: vec![0f64; n_thetas * n_classes],
        }
    }

    /// The number of thresholds `Θ`.
    #[inline]
    pub fn n_thetas(&self) -> usize {
        self.n_thetas
    }

    /// The number of classes `C`.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Weight of class `c` strictly above `theta[t]`.
    #[inline(always)]
    pub fn q(&self, t: usize, c: usize) -> f64 {
        self.q[t * self.n_classes + c]
    }

    /// Signed weight of class `c` strictly above `theta[t]`.
    #[inline(always)]
    pub fn u(&self, t: usize, c: usize) -> f64 {
        self.u[t * self.n_classes + c]
    }

    /// Fill `q` and `u` for a feature in `O(N C + Θ C)` time.
    ///
    /// Each example votes into the bin of its value, then the bins are
    /// summed from the top threshold down.
    /// Examples not above `theta[0]` are skipped,
    /// examples above the last threshold vote into the last bin.
    pub fn accumulate(
        &mut self,
        ladder: &ThresholdLadder,
        values: &[i32],
        targets: &[usize],
        weights: &[f64],
    )
    {
        let n_classes = self.n_classes;
        debug_assert_eq!(ladder.len(), self.n_thetas);
        debug_assert_eq!(values.len(), targets.len());
        debug_assert_eq!(weights.len(), targets.len() * n_classes);

        self.q.iter_mut().for_each(|q| *q = 0f64);
        self.u.iter_mut().for_each(|u| *u = 0f64);

        // Every example votes.
        let rows = weights.chunks_exact(n_classes);
        for ((&value, &y), row) in values.iter().zip(targets).zip(rows) {
            let Some(t) = ladder.bin(value) else { continue; };

            let offset = t * n_classes;
            let q = &mut self.q[offset..offset + n_classes];
            let u = &mut self.u[offset..offset + n_classes];
            for (c, &w) in row.iter().enumerate() {
                q[c] += w;
                u[c] += w * sign(y, c);
            }
        }

        // Cumulative from above.
        for t in (0..self.n_thetas.saturating_sub(1)).rev() {
            let (lo, hi) = (t * n_classes, (t + 1) * n_classes);
            for c in 0..n_classes {
                self.q[lo + c] += self.q[hi + c];
                self.u[lo + c] += self.u[hi + c];
            }
        }
    }
}
