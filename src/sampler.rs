//! Categorical sampling over topic weights.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{LdaError, Result};

/// Scale `weights` in place so they sum to 1 and return the original sum.
///
/// Only a sum that is not finite or has fallen below the smallest normal
/// `f64` is rejected with `NumericDegeneracy`; the weights are then left
/// untouched. Small but representable sums normalize exactly.
pub fn normalize(weights: &mut [f64]) -> Result<f64> {
    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum < f64::MIN_POSITIVE {
        return Err(LdaError::NumericDegeneracy { sum });
    }
    for w in weights.iter_mut() {
        *w /= sum;
    }
    Ok(sum)
}

/// Draw an index from `probs` by inverting the cumulative distribution.
///
/// Entries with zero probability are never selected. Weights that cannot
/// form a distribution (all zero, negative, NaN) yield `NumericDegeneracy`.
pub fn sample_categorical<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> Result<usize> {
    let dist = WeightedIndex::<f64>::new(probs).map_err(|_| LdaError::NumericDegeneracy {
        sum: probs.iter().sum(),
    })?;
    Ok(dist.sample(rng))
}

/// Uniform draw over `0..n`; the recovery path for degenerate weights.
pub fn sample_uniform<R: Rng + ?Sized>(n: usize, rng: &mut R) -> usize {
    rng.gen_range(0..n)
}
