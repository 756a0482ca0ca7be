//! Weighted draw engine

use crate::{Error, ItemCard, RandomSource, Result};

/// Weight used for sampling.
///
/// Missing (non-finite) and zero weights count as the default `1.0`;
/// negative weights count as `0.0`.
pub fn effective_weight(weight: f64) -> f64 {
    if !weight.is_finite() || weight == 0.0 {
        1.0
    } else {
        weight.max(0.0)
    }
}

/// Sample one card with probability proportional to its weight.
///
/// A pool whose weights sum to zero or less is sampled uniformly.
pub fn draw<'a, R>(candidates: &[&'a ItemCard], rng: &mut R) -> Result<&'a ItemCard>
where
    R: RandomSource + ?Sized,
{
    if candidates.is_empty() {
        return Err(Error::NoItemsAvailable);
    }

    let mut weights: Vec<f64> = candidates
        .iter()
        .map(|card| effective_weight(card.weight))
        .collect();
    if weights.iter().sum::<f64>() <= 0.0 {
        weights = vec![1.0; candidates.len()];
    }

    let index = rng
        .weighted_index(&weights)
        .or_else(|| rng.index(candidates.len()))
        .ok_or(Error::NoItemsAvailable)?;
    Ok(candidates[index])
}
