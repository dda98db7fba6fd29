//! Randomness sources
//!
//! The engine never touches a concrete generator. It draws through
//! [`RandomSource`], which production code backs with a seeded ChaCha
//! stream and tests back with a scripted sequence.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::RngError;

/// Uniform and weighted-categorical draws
pub trait RandomSource {
    /// Uniform real in [0, 1)
    fn uniform(&mut self) -> f64;

    /// Inverse-CDF draw over discrete weights
    ///
    /// Draws `u = uniform() * W` and returns the first item whose running
    /// cumulative weight strictly exceeds `u`. Consumes exactly one uniform.
    fn weighted_choice<'a, T>(&mut self, items: &'a [T], weights: &[f64]) -> Result<&'a T, RngError> {
        if items.len() != weights.len() {
            return Err(RngError::LengthMismatch {
                items: items.len(),
                weights: weights.len(),
            });
        }
        let index = self.weighted_index(weights)?;
        Ok(&items[index])
    }

    /// Index form of [`RandomSource::weighted_choice`]
    fn weighted_index(&mut self, weights: &[f64]) -> Result<usize, RngError> {
        let total = total_weight(weights)?;
        let u = self.uniform() * total;

        let mut cumulative = 0.0;
        let mut last_positive = 0;
        for (index, &weight) in weights.iter().enumerate() {
            if weight > 0.0 {
                last_positive = index;
            }
            cumulative += weight;
            if cumulative > u {
                return Ok(index);
            }
        }
        // Rounding left u at or above the accumulated sum
        Ok(last_positive)
    }
}

/// Sum of weights, rejecting an empty, negative, non-finite or zero table
pub fn total_weight(weights: &[f64]) -> Result<f64, RngError> {
    if weights.is_empty() {
        return Err(RngError::EmptyItems);
    }
    let mut total = 0.0;
    for (index, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(RngError::InvalidWeight { index, weight });
        }
        total += weight;
    }
    if total <= 0.0 {
        return Err(RngError::ZeroTotalWeight);
    }
    Ok(total)
}

/// Seeded ChaCha8 source
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    /// Reproducible source from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reproducible source on an independent stream of the same seed
    ///
    /// Parallel batch workers use `(seed, iteration)` so every worker draws
    /// from its own sequence and the whole batch still replays exactly.
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }

    /// Non-reproducible source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Optional seed: `Some` replays, `None` draws fresh entropy
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededSource {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Plays back a fixed sequence of uniforms, cycling when exhausted
///
/// An empty script yields `0.0` forever. Values are clamped into [0, 1).
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Source that always returns the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Append further draws to the script
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = f64>) {
        self.values.extend(values);
    }

    /// Number of uniforms consumed so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
