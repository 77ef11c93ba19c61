//! Seeded random source backing production runs.

use alien_invasion_core::RandomIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic [`RandomIndex`] source; the seed fully determines a run.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a source seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomIndex for SeededRandom {
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index requires a non-empty range");
        self.rng.gen_range(0..len)
    }
}
