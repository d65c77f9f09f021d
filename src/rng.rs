//! Uniform random draws for the simulation.
//!
//! Every draw the simulation makes goes through [`RandomSource::unit`], so a
//! scripted source can replay an exact sequence in tests.

use std::collections::VecDeque;

/// Source of uniform values in `[0, 1)`.
pub trait RandomSource {
    fn unit(&mut self) -> f64;

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.unit() * (hi - lo)
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    fn index(&mut self, n: usize) -> usize {
        ((self.unit() * n as f64) as usize).min(n - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

/// `fastrand`-backed source.
#[derive(Clone, Debug)]
pub struct FastRandom {
    rng: fastrand::Rng,
}

impl FastRandom {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Seeded when `seed` is given, otherwise from entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }
}

impl Default for FastRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRandom {
    fn unit(&mut self) -> f64 {
        self.rng.f64()
    }
}

/// Replays a fixed script of draws, then a fallback value forever.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    script: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: draws.into_iter().collect(),
            fallback: 0.0,
            drawn: 0,
        }
    }

    /// Returns `value` on every draw.
    pub fn repeating(value: f64) -> Self {
        Self::new(Vec::<f64>::new()).with_fallback(value)
    }

    /// Value returned once the script is exhausted.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, draws: impl IntoIterator<Item = f64>) {
        self.script.extend(draws);
    }

    /// Number of draws consumed so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        self.drawn += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}
