//! Deterministic random number generation for deck generation.
//!
//! Every random decision in the crate (slot activation, quantities,
//! weighted picks, tie breaks, slot rotation) draws from a `DeckRng`
//! passed in by the caller. There is no global generator.
//!
//! The same seed and the same sequence of calls always yield the same
//! draws, so a seeded assembly is reproducible.
//!
//! ```
//! use ccg_deckgen::core::DeckRng;
//!
//! let mut a = DeckRng::new(7);
//! let mut b = DeckRng::new(7);
//! assert_eq!(a.gen_range_usize(0..100), b.gen_range_usize(0..100));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable RNG threaded through selection and assembly.
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in a half-open range. The range must be non-empty.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Uniform integer in `[low, high]`. Returns `low` when `high <= low`.
    pub fn gen_range_inclusive(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            low
        } else {
            self.inner.gen_range(low..=high)
        }
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        !probability.is_nan() && self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Index of a uniformly chosen element, `None` for an empty slice.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.inner.gen_range(0..len))
    }

    /// Index drawn with probability proportional to its weight.
    ///
    /// Non-positive weights are never drawn; `None` when no weight is
    /// positive.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if !(total > 0.0 && total.is_finite()) {
            return None;
        }

        let mut remaining = self.inner.gen::<f64>() * total;
        let mut fallback = None;
        for (i, weight) in weights.iter().copied().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            if remaining < weight {
                return Some(i);
            }
            remaining -= weight;
            fallback = Some(i);
        }
        // Rounding can leave a sliver past the last positive weight.
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = DeckRng::new(42);
        let mut b = DeckRng::new(42);
        assert_eq!(a.seed(), 42);

        for _ in 0..100 {
            assert_eq!(a.gen_range_usize(0..1000), b.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_gen_range_inclusive_bounds() {
        let mut rng = DeckRng::new(3);
        for _ in 0..200 {
            assert!((2..=4).contains(&rng.gen_range_inclusive(2, 4)));
        }
        assert_eq!(rng.gen_range_inclusive(5, 5), 5);
        assert_eq!(rng.gen_range_inclusive(5, 1), 5);
    }

    #[test]
    fn test_gen_bool_clamps() {
        let mut rng = DeckRng::new(1);
        assert!(rng.gen_bool(1.5));
        assert!(!rng.gen_bool(-0.5));
        assert!(!rng.gen_bool(f64::NAN));
    }

    #[test]
    fn test_choose_index() {
        let mut rng = DeckRng::new(9);
        assert_eq!(rng.choose_index(0), None);
        assert_eq!(rng.choose_index(1), Some(0));
        for _ in 0..50 {
            assert!(rng.choose_index(3).is_some_and(|i| i < 3));
        }
    }

    #[test]
    fn test_choose_weighted_skips_non_positive() {
        let mut rng = DeckRng::new(42);
        for _ in 0..20 {
            assert_eq!(rng.choose_weighted(&[0.0, 100.0, 0.0]), Some(1));
            assert_eq!(rng.choose_weighted(&[-50.0, 1.0]), Some(1));
        }
        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, -1.0]), None);
    }

    #[test]
    fn test_choose_weighted_follows_weights() {
        let mut rng = DeckRng::new(5);
        let mut hits = [0usize; 2];
        for _ in 0..2000 {
            if let Some(i) = rng.choose_weighted(&[1.0, 9.0]) {
                hits[i] += 1;
            }
        }
        assert!(hits[1] > hits[0] * 4);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = DeckRng::new(42);
        let mut data: Vec<u32> = (1..=10).collect();
        rng.shuffle(&mut data);
        data.sort_unstable();
        assert_eq!(data, (1..=10).collect::<Vec<_>>());
    }
}
