//! This file defines some functions that checks some pre-conditions
//! E.g., the shape of the problem or the range of the targets.

use crate::error::{JointBoostError, Result};
use crate::provider::ThresholdLadder;


/// Check the acceptance probability of a feature.
/// Panics if `fraction` is not in `[0, 1]`.
#[inline(always)]
pub(crate) fn accept_fraction(fraction: f64) {
    assert!(
        (0f64..=1f64).contains(&fraction),
        "accept fraction must be in [0, 1]. got {fraction}."
    );
}


/// Check the dimensions reported by a feature provider.
/// At least two classes are required,
/// since every sharing set holds between `1` and `C - 1` classes.
#[inline(always)]
pub(crate) fn dimensions(
    n_examples: usize,
    n_features: usize,
    n_classes: usize,
) -> Result<()>
{
    if n_examples == 0 {
        return Err(JointBoostError::InvalidDimension {
            name: "N", value: n_examples, min: 1,
        });
    }
    if n_features == 0 {
        return Err(JointBoostError::InvalidDimension {
            name: "D", value: n_features, min: 1,
        });
    }
    if n_classes < 2 {
        return Err(JointBoostError::InvalidDimension {
            name: "C", value: n_classes, min: 2,
        });
    }
    Ok(())
}


/// Check the threshold ladder `theta[t] = start + t * inc`.
#[inline(always)]
pub(crate) fn ladder(ladder: &ThresholdLadder) -> Result<()> {
    if ladder.len() == 0 {
        return Err(JointBoostError::InvalidDimension {
            name: "NumThetas", value: 0, min: 1,
        });
    }
    if ladder.increment() <= 0 {
        return Err(
            JointBoostError::InvalidThresholdIncrement(ladder.increment())
        );
    }
    let last = ladder.start() as i64
        + (ladder.len() as i64 - 1) * ladder.increment() as i64;
    if last > i32::MAX as i64 {
        return Err(JointBoostError::ThresholdOverflow {
            start: ladder.start(),
            increment: ladder.increment(),
            count: ladder.len(),
        });
    }
    Ok(())
}


/// Check the acceptance probability reported by a feature provider.
#[inline(always)]
pub(crate) fn provided_accept_fraction(fraction: f64) -> Result<()> {
    if !(0f64..=1f64).contains(&fraction) {
        return Err(JointBoostError::InvalidAcceptFraction(fraction));
    }
    Ok(())
}


/// Check that a buffer filled by a feature provider has the right length.
#[inline(always)]
pub(crate) fn buffer_length(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(JointBoostError::BufferLength { expected, got });
    }
    Ok(())
}


/// Check that every target is a class index in `[0, C)`.
#[inline(always)]
pub(crate) fn targets(targets: &[usize], n_classes: usize) -> Result<()> {
    match targets.iter().position(|&y| y >= n_classes) {
        Some(index) => Err(JointBoostError::TargetOutOfRange {
            index,
            target: targets[index],
            n_classes,
        }),
        None => Ok(()),
    }
}
