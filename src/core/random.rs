//! Uniform variate generation.
//!
//! Every stochastic draw in a run (inter-arrival time, service time,
//! routing choice) goes through a [`VariateGenerator`]. Two sources are
//! available: a 48-bit linear congruential generator with the classic
//! `java.util.Random` constants, and rand's `StdRng`.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const LCG_MODULUS_MASK: u64 = (1 << 48) - 1;
const LCG_MULTIPLIER: u64 = 25_214_903_917;
const LCG_INCREMENT: u64 = 11;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// 48-bit linear congruential generator.
///
/// `seed = (a * seed + c) mod 2^48`; each output keeps bits 47..16 of the
/// new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg48 {
    state: u64,
}

impl Lcg48 {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed & LCG_MODULUS_MASK,
        }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    fn step(&mut self) -> u32 {
        self.state = LCG_MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(LCG_INCREMENT)
            & LCG_MODULUS_MASK;
        (self.state >> 16) as u32
    }
}

impl RngCore for Lcg48 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.step() as u64;
        let low = self.step() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg48 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    /// The integer seed is the initial LCG state, no scrambling.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Which pseudo-random source backs a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    #[default]
    Lcg48,
    StdRng,
}

/// Uniform [0, 1) variates from a seeded source
pub struct VariateGenerator {
    rng: Box<dyn RngCore + Send>,
}

impl VariateGenerator {
    pub fn new(kind: GeneratorKind, seed: u64) -> Self {
        let rng: Box<dyn RngCore + Send> = match kind {
            GeneratorKind::Lcg48 => Box::new(Lcg48::seed_from_u64(seed)),
            GeneratorKind::StdRng => Box::new(StdRng::seed_from_u64(seed)),
        };
        Self { rng }
    }

    /// Next value in [0, 1)
    pub fn next(&mut self) -> f64 {
        self.rng.next_u32() as f64 / TWO_POW_32
    }

    /// `low + next() * (high - low)`; callers guarantee `low <= high`
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next() * (high - low)
    }
}

impl std::fmt::Debug for VariateGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariateGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_known_sequence() {
        let mut rng = VariateGenerator::new(GeneratorKind::Lcg48, 0);
        assert_eq!(rng.next(), 0.0);
        assert_eq!(rng.next(), 4_232_237.0 / TWO_POW_32);
        assert_eq!(rng.next(), 178_803_790.0 / TWO_POW_32);
    }

    #[test]
    fn test_lcg_state_is_masked_to_48_bits() {
        let mut lcg = Lcg48::new(u64::MAX);
        assert_eq!(lcg.state(), LCG_MODULUS_MASK);
        for _ in 0..1000 {
            lcg.next_u32();
            assert!(lcg.state() <= LCG_MODULUS_MASK);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        for kind in [GeneratorKind::Lcg48, GeneratorKind::StdRng] {
            let mut a = VariateGenerator::new(kind, 12345);
            let mut b = VariateGenerator::new(kind, 12345);
            for _ in 0..500 {
                assert_eq!(a.next().to_bits(), b.next().to_bits());
            }
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        for kind in [GeneratorKind::Lcg48, GeneratorKind::StdRng] {
            let mut rng = VariateGenerator::new(kind, 7);
            for _ in 0..10_000 {
                let u = rng.next();
                assert!((0.0..1.0).contains(&u));
            }
        }
    }

    #[test]
    fn test_uniform_respects_bounds() {
        let mut rng = VariateGenerator::new(GeneratorKind::Lcg48, 99);
        for _ in 0..10_000 {
            let x = rng.uniform(5.0, 6.0);
            assert!((5.0..6.0).contains(&x));
        }
        assert_eq!(rng.uniform(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_fill_bytes_handles_partial_chunks() {
        let mut lcg = Lcg48::new(1);
        let mut buf = [0u8; 7];
        lcg.fill_bytes(&mut buf);
        assert!(buf.iter().any(|b| *b != 0));
    }
}
