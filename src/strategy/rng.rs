// src/strategy/rng.rs

//! Seeded randomness for participation gating, tails drift and inspections.
//!
//! The allocation math never draws from this source.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed value that asks for a wall-clock seed.
pub const CLOCK_SEED: i64 = -1;

/// Deterministic RNG owned by a single facility.
#[derive(Debug, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl SimRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeds from the configured value; [`CLOCK_SEED`] uses the current time.
    pub fn from_config_seed(seed: i64) -> Self {
        if seed == CLOCK_SEED {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            Self::from_seed_u64(nanos)
        } else {
            Self::from_seed_u64(seed as u64)
        }
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_seed_u64(0)
    }
}
