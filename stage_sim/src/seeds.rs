//! Deterministic per-iteration seed derivation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Seeds for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SeedPair {
    /// Seed handed to the actor factory
    pub actor: u64,

    /// Seed handed to the scenario factory
    pub scenario: u64,
}

/// Derives per-iteration seed pairs from a single root seed.
///
/// One generator is drawn from exactly once per iteration, in dispatch order.
/// The n-th pair therefore depends only on the root seed and n, never on how
/// many iterations run at once or in which order they finish.
///
/// Seeds are 63-bit so they stay non-negative when read as `i64`.
pub struct SeedDeriver {
    rng: ChaCha8Rng,
}

impl SeedDeriver {
    /// Creates a deriver for the given root seed.
    pub fn new(root_seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(root_seed),
        }
    }

    /// Draws the next iteration's seeds.
    pub fn next_pair(&mut self) -> SeedPair {
        let actor = self.rng.gen::<u64>() >> 1;
        let scenario = self.rng.gen::<u64>() >> 1;
        SeedPair { actor, scenario }
    }
}

impl Iterator for SeedDeriver {
    type Item = SeedPair;

    fn next(&mut self) -> Option<SeedPair> {
        Some(self.next_pair())
    }
}
