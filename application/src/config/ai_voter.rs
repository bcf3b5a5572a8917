//! AI voter scheduling parameters.
//!
//! [`AiVoterConfig`] controls the simulated "thinking time" of AI-controlled
//! party members. These are application-layer concerns, not domain policy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Inclusive range a random delay is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// A range that never waits
    pub fn zero() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draw a delay; an inverted range collapses to `min`
    pub fn sample(&self, rng: &mut impl Rng) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

/// AI voter scheduling parameters.
#[derive(Debug, Clone)]
pub struct AiVoterConfig {
    /// Wait before the first AI vote.
    pub initial_delay: DelayRange,
    /// Wait between consecutive AI voters.
    pub vote_gap: DelayRange,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for AiVoterConfig {
    fn default() -> Self {
        Self {
            initial_delay: DelayRange::from_millis(3_000, 8_000),
            vote_gap: DelayRange::from_millis(1_000, 3_000),
            seed: None,
        }
    }
}

impl AiVoterConfig {
    /// No waiting at all, used by tests and batch tooling
    pub fn immediate() -> Self {
        Self {
            initial_delay: DelayRange::zero(),
            vote_gap: DelayRange::zero(),
            seed: None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_initial_delay(mut self, delay: DelayRange) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_vote_gap(mut self, gap: DelayRange) -> Self {
        self.vote_gap = gap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// RNG for one scheduled batch
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let config = AiVoterConfig::default();
        assert_eq!(config.initial_delay.min, Duration::from_secs(3));
        assert_eq!(config.initial_delay.max, Duration::from_secs(8));
        assert_eq!(config.vote_gap.min, Duration::from_secs(1));
        assert_eq!(config.vote_gap.max, Duration::from_secs(3));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_sample_stays_in_range() {
        let range = DelayRange::from_millis(100, 200);
        let mut rng = AiVoterConfig::default().with_seed(42).rng();
        for _ in 0..100 {
            let delay = range.sample(&mut rng);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(200));
        }
    }

    #[test]
    fn test_inverted_range_collapses_to_min() {
        let range = DelayRange::from_millis(500, 100);
        let mut rng = AiVoterConfig::default().with_seed(1).rng();
        assert_eq!(range.sample(&mut rng), Duration::from_millis(500));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = AiVoterConfig::immediate().with_seed(9);
        let a: u64 = config.rng().r#gen();
        let b: u64 = config.rng().r#gen();
        assert_eq!(a, b);
    }
}
