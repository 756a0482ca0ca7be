//! Random sources for draws and card effects
//!
//! Every random decision in the engine goes through [`RandomSource`], so the
//! service can hold one seeded generator and tests can script exact rolls.
//! [`GameRng`] is a small xorshift64 generator that behaves identically on all
//! platforms for a given seed.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of uniform rolls in `[0, 1)`.
///
/// Every other decision is derived from `next_f64`, which keeps scripted
/// sources simple: one queued roll per decision.
pub trait RandomSource {
    /// Generate a random f64 in range [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Generate a random bool with given probability of true
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Pick a uniform index in `0..len`
    ///
    /// Returns None if `len` is zero.
    fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let i = (self.next_f64() * len as f64) as usize;
        Some(i.min(len - 1))
    }

    /// Pick a random index for a weighted list
    ///
    /// Returns None if weights is empty or all weights are zero
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || weights.is_empty() {
            return None;
        }

        let mut threshold = self.next_f64() * total;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            if threshold < weight {
                return Some(i);
            }
            threshold -= weight;
        }

        // Float drift: land on the last positive weight
        weights.iter().rposition(|&w| w > 0.0)
    }
}

/// A deterministic random number generator
///
/// Uses xorshift64 for simplicity and reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // Ensure non-zero state (xorshift requires this)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from the wall clock and process id
    ///
    /// Used when no fixed seed is configured; draws are then not reproducible.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        let mut rng = Self::new(nanos ^ ((std::process::id() as u64) << 32));
        // Discard the first outputs; nearby seeds start out correlated.
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64 algorithm
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        // 53 high bits give an exactly representable value below 1.0
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Replays a fixed sequence of rolls.
///
/// Once the script runs out every further roll is `0.0`, which reads as a
/// "hit" for any positive probability and as the first candidate for picks.
#[derive(Debug, Clone, Default)]
pub struct SequenceRng {
    rolls: VecDeque<f64>,
}

impl SequenceRng {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Rolls not yet consumed
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        self.rolls
            .pop_front()
            .map(|r| r.clamp(0.0, 1.0 - f64::EPSILON))
            .unwrap_or(0.0)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
