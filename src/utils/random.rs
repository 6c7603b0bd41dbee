//! Sources of randomness for secret generation.
//!
//! Secrets must not be guessable from earlier games, so production code uses
//! [`OsRandom`], which draws every value from an OS-seeded CSPRNG.
//! [`SeededRandom`] exists for reproducible tests and demos.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies uniformly distributed indices.
///
/// Implementations are shared between concurrent game creations and must be
/// safe to call from several threads at once.
pub trait RandomSource: Send + Sync {
    /// Returns an integer drawn uniformly from `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    fn next_index(&self, bound: usize) -> usize;
}

/// Random source backed by the thread-local CSPRNG.
///
/// Every call draws from `rand::rng()`, which is seeded from the operating
/// system and periodically reseeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl OsRandom {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for OsRandom {
    fn next_index(&self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be positive");
        rand::rng().random_range(0..bound)
    }
}

/// Deterministic random source for tests and reproducible sessions.
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
    fn next_index(&self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be positive");
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..bound)
    }
}
