//! Randomizer module - probability-weighted archetype selection
//!
//! A [`ProbabilityTable`] holds one weight per archetype. Drawing walks the
//! cumulative distribution: pick `u` uniformly in `[0, 1)`, accumulate weights
//! until the running sum exceeds `u`, and return that index.
//!
//! Randomness comes from any [`rand::Rng`]; sessions use a seeded
//! [`rand_pcg::Pcg32`] so the same seed produces the same piece sequence.

use rand::Rng;

use crate::error::{CoreError, Result};
use crate::types::PROBABILITY_EPSILON;

/// Immutable table of spawn weights
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    weights: Vec<f64>,
    /// Index returned when floating error leaves `u` past the final sum
    fallback: usize,
}

impl ProbabilityTable {
    /// Build a table, failing fast on an invalid distribution.
    ///
    /// Every weight must be finite and non-negative, and the weights must sum
    /// to 1 within `PROBABILITY_EPSILON`.
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(CoreError::EmptyProbabilities);
        }

        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidProbability { index, value });
            }
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_EPSILON {
            return Err(CoreError::ProbabilitySum { sum });
        }

        let fallback = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);

        Ok(Self {
            weights: weights.to_vec(),
            fallback,
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Map a uniform value in `[0, 1)` to an index
    pub fn pick(&self, u: f64) -> usize {
        let mut sum = 0.0;
        for (i, &w) in self.weights.iter().enumerate() {
            sum += w;
            if sum > u {
                return i;
            }
        }
        self.fallback
    }

    /// Draw an index using the given RNG
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.random();
        self.pick(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pick_walks_cumulative_sum() {
        let table = ProbabilityTable::new(&[0.25, 0.25, 0.5]).unwrap();
        assert_eq!(table.pick(0.0), 0);
        assert_eq!(table.pick(0.24), 0);
        assert_eq!(table.pick(0.25), 1);
        assert_eq!(table.pick(0.49), 1);
        assert_eq!(table.pick(0.5), 2);
        assert_eq!(table.pick(0.999), 2);
    }

    #[test]
    fn test_pick_skips_zero_weights() {
        let table = ProbabilityTable::new(&[0.0, 1.0, 0.0]).unwrap();
        for u in [0.0, 0.3, 0.7, 0.999_999] {
            assert_eq!(table.pick(u), 1);
        }
    }

    #[test]
    fn test_pick_falls_back_to_last_nonzero() {
        // Sum within epsilon but below u
        let table = ProbabilityTable::new(&[0.5, 0.4999995, 0.0]).unwrap();
        assert_eq!(table.pick(0.9999999), 1);
    }

    #[test]
    fn test_sample_is_deterministic_per_seed() {
        let table = ProbabilityTable::new(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(table.sample(&mut a), table.sample(&mut b));
        }
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = ProbabilityTable::new(&[1.5, -0.5]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidProbability { index: 1, .. }));
    }

    #[test]
    fn test_rejects_nan_weight() {
        let err = ProbabilityTable::new(&[f64::NAN, 1.0]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidProbability { index: 0, .. }));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            ProbabilityTable::new(&[]),
            Err(CoreError::EmptyProbabilities)
        ));
    }
}
