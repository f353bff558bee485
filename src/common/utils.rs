//! Provides some helper functions.

/// Returns `+1` if `target == class` and `-1` otherwise.
/// This is the `z_i^c` label of the one-vs-all reduction.
#[inline(always)]
pub fn sign(target: usize, class: usize) -> f64 {
    if target == class { 1f64 } else { -1f64 }
}


/// Returns the unnormalized exponential loss `Σ_i Σ_c w[i][c]`
/// of a row-major weight matrix.
#[inline(always)]
pub fn exponential_loss(weights: &[f64]) -> f64 {
    weights.iter()
        .copied()
        .sum::<f64>()
}


/// Returns the index of the minimal value of `errors`.
/// Ties are broken by the lowest index and `NaN`s never win.
/// Returns `None` if no entry is finite.
#[inline(always)]
pub fn argmin_finite(errors: &[f64]) -> Option<usize> {
    errors.iter()
        .enumerate()
        .filter(|(_, e)| e.is_finite())
        .fold(None, |acc: Option<(usize, f64)>, (i, &e)| {
            match acc {
                Some((_, best)) if best <= e => acc,
                _ => Some((i, e)),
            }
        })
        .map(|(i, _)| i)
}


/// Formats milliseconds as a fixed-width string.
pub fn time_format(millisec: u128) -> String {
    if millisec < 1_000 {
        return format!("  0.{:0>3}s", millisec);
    }
    let sec = millisec / 1_000;
    let millisec = millisec % 1_000;
    if sec < 60 {
        return format!(" {:0>2}.{:0>3}s", sec, millisec);
    }
    let min = sec / 60;
    let sec = sec % 60;
    if min < 60 {
        return format!(" {:0>2}m {:0>2}s", min, sec);
    }
    let hours = min / 60;
    let min = min % 60;
    format!(" {:0>2}h {:0>2}m", hours, min)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(sign(2, 2), 1f64);
        assert_eq!(sign(2, 0), -1f64);
    }

    #[test]
    fn test_exponential_loss() {
        let weights = vec![1f64; 12];
        assert_eq!(exponential_loss(&weights), 12f64);
    }

    #[test]
    fn test_argmin_finite_01() {
        let errors = [f64::INFINITY, 3.0, 1.0, 1.0, 2.0];
        assert_eq!(argmin_finite(&errors), Some(2));
    }

    #[test]
    fn test_argmin_finite_02() {
        let errors = [f64::INFINITY, f64::NAN];
        assert_eq!(argmin_finite(&errors), None);
    }

    #[test]
    fn test_time_format() {
        assert_eq!(time_format(12), "  0.012s");
        assert_eq!(time_format(61_000), " 01m 01s");
    }
}
