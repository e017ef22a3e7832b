//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct wraps the `rand` crate's `StdRng` and provides
//! the handful of draws the search needs: Bernoulli trials, uniform indices and
//! uniform picks from a slice of choices.
//!
//! ## Example
//!
//! ```rust
//! use hyperevo::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let widths = [64, 128, 256];
//!
//! let width = rng.choose(&widths).copied();
//! assert!(width.is_some());
//!
//! if rng.chance(0.1) {
//!     println!("mutating");
//! }
//! ```

use rand::{
    distributions::uniform::{SampleRange, SampleUniform},
    rngs::StdRng,
    seq::SliceRandom,
    Rng, SeedableRng,
};

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible searches, tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns `true` with the given probability.
    ///
    /// Draws a uniform number in `[0, 1)` and compares it against `probability`,
    /// so `0.0` never succeeds and `1.0` always does.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    /// A fair coin flip.
    pub fn coin_flip(&mut self) -> bool {
        self.chance(0.5)
    }

    /// Returns a uniform index in `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Picks one element of `items` uniformly, or `None` when it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Generates a random number in the given range.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.gen_range(range)
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chance_extremes() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        for _ in 0..1000 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_index_in_bounds() {
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..1000 {
            assert!(rng.index(5) < 5);
        }
        assert_eq!(rng.index(1), 0);
    }

    #[test]
    fn test_choose() {
        let mut rng = RandomNumberGenerator::new();
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());

        let items = [1, 2, 3];
        for _ in 0..100 {
            let picked = rng.choose(&items).unwrap();
            assert!(items.contains(picked));
        }
    }

    #[test]
    fn test_gen_range_inclusive() {
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..1000 {
            let depth: usize = rng.gen_range(1..=4);
            assert!((1..=4).contains(&depth));
        }
    }

    #[test]
    fn test_clone() {
        let mut rng1 = RandomNumberGenerator::from_seed(42);
        let mut rng2 = rng1.clone();

        // Both RNGs should generate the same sequence after cloning
        let nums1: Vec<usize> = (0..5).map(|_| rng1.index(100)).collect();
        let nums2: Vec<usize> = (0..5).map(|_| rng2.index(100)).collect();

        assert_eq!(nums1, nums2);
    }
}
