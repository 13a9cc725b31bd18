/*!
 * Random Source
 * Uniform draws for the ticket lottery
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random draws for lottery selection
pub trait RandomSource: Send {
    /// Draw uniformly from `[0, range)`; `range` must be non-zero
    fn next(&mut self, range: u32) -> u32;
}

/// Production source seeded once from OS entropy
pub struct EntropyRng {
    rng: StdRng,
}

impl EntropyRng {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed-seed source for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropyRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRng {
    fn next(&mut self, range: u32) -> u32 {
        self.rng.gen_range(0..range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_stay_in_range() {
        let mut rng = EntropyRng::new();
        for _ in 0..1000 {
            assert!(rng.next(7) < 7);
        }
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let mut a = EntropyRng::with_seed(99);
        let mut b = EntropyRng::with_seed(99);

        let draws_a: Vec<u32> = (0..32).map(|_| a.next(1000)).collect();
        let draws_b: Vec<u32> = (0..32).map(|_| b.next(1000)).collect();
        assert_eq!(draws_a, draws_b);
    }
}
