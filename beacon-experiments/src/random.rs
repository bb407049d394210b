//! Sources of uniform draws in `[0, 1)`

use std::sync::{Mutex, PoisonError};

use rand::prelude::*;
use rand::rngs::StdRng;

/// Supplies uniform draws for weighted selection.
pub trait RandomSource: Send + Sync {
    /// A draw in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// Draws from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Reproducible draws from a seeded generator.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .r#gen::<f64>()
    }
}

/// Always returns the same draw (clamped into `[0, 1)`).
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(f64);

impl FixedRandom {
    pub fn new(unit: f64) -> Self {
        let unit = if unit.is_finite() {
            unit.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        };
        Self(unit)
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}
