use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Private random stream owned by a single creature.
pub type CreatureRng = ChaCha8Rng;

/// Derives independent, reproducible creature seeds from one master seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSource {
    master_seed: u64,
}

impl SeedSource {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn creature_seed(&self, creature: u64) -> u64 {
        let mut seed = self.master_seed;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= creature.wrapping_mul(48271);
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^ (seed >> 29)
    }
}

impl Default for SeedSource {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Seeds a creature stream, drawing the seed from process entropy when none
/// is given. The seed actually used is returned alongside the stream.
pub fn creature_rng(seed: Option<u64>) -> (u64, CreatureRng) {
    let seed = seed.unwrap_or_else(rand::random);
    (seed, ChaCha8Rng::seed_from_u64(seed))
}

pub trait RngExt {
    /// Uniform in `[min, max)`; returns `min` when the range is empty.
    fn random_f32(&mut self, min: f32, max: f32) -> f32;
}

impl<R: Rng> RngExt for R {
    fn random_f32(&mut self, min: f32, max: f32) -> f32 {
        self.gen::<f32>() * (max - min) + min
    }
}
