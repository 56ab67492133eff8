//! RNG module - seedable randomness for shuffles and scatter placement
//!
//! Wraps a `rand` standard RNG so every random decision the engine makes goes
//! through one type. A session created with a seed replays the same shuffles,
//! which keeps tests and bug reports deterministic; without a seed the RNG is
//! seeded from the operating system.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct PuzzleRng {
    inner: StdRng,
    seed: Option<u64>,
}

impl PuzzleRng {
    /// Create a deterministic RNG from a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create an RNG seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
            seed: None,
        }
    }

    /// Seeded when `seed` is given, OS entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// The seed this RNG was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Uniform value in `[min, max)`. Collapses to `min` for empty ranges.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if !(max > min) {
            return min;
        }
        self.inner.random_range(min..max)
    }

    /// Fair coin
    pub fn coin_flip(&mut self) -> bool {
        self.inner.random_bool(0.5)
    }
}

impl Default for PuzzleRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
