//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! Every source of randomness (arrival re-derivation, transition draws,
//! duration sampling) goes through one `SimRng` per run.  Independent runs
//! that share a master seed get their own *stream*:
//!
//!   seed = master_seed XOR (stream * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream numbers uniformly across the seed space.
//! This means:
//!
//! - Repetition `i` of a batch is reproducible on its own, whatever order (or
//!   thread) the batch runs repetitions in.
//! - Adding repetitions at the end does not disturb the earlier ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seedable generator threaded explicitly through every sampling call.
///
/// Not `Sync`: one run owns one `SimRng`.  Runs on other threads derive their
/// own with [`SimRng::stream`].
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Independent stream `stream` of the master seed `seed`.
    pub fn stream(seed: u64, stream: u64) -> Self {
        // `stream + 1` so stream 0 differs from `SimRng::new(seed)`.
        let mixed = seed ^ stream.wrapping_add(1).wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(mixed))
    }

    /// Expose the inner `SmallRng` for use with `rand_distr` distribution
    /// types (`dist.sample(rng.inner())`).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
