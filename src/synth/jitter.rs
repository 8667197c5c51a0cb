//! Jitter sources for link latency synthesis.
//!
//! Production runs draw from an OS-seeded generator; tests and reproducible
//! runs use a fixed seed or a constant.

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Half-width of the jitter interval, in milliseconds.
pub const JITTER_MS: f64 = 10.0;

/// A source of per-link jitter in `[-JITTER_MS, JITTER_MS)`.
pub trait JitterSource: Send + Debug {
    fn sample(&mut self) -> f64;
}

/// Uniformly distributed jitter.
#[derive(Debug)]
pub struct UniformJitter {
    rng: StdRng,
}

impl UniformJitter {
    /// Seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for UniformJitter {
    fn sample(&mut self) -> f64 {
        self.rng.random_range(-JITTER_MS..JITTER_MS)
    }
}

/// Constant jitter, clamped into the valid interval.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&mut self) -> f64 {
        self.0.clamp(-JITTER_MS, JITTER_MS)
    }
}
