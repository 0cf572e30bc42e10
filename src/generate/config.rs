//! Deck assembler configuration.

use serde::{Deserialize, Serialize};

use crate::core::EvalOptions;

/// Order in which the assembler visits its slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationPolicy {
    /// Cycle through the slots, wrapping to the first.
    #[default]
    SequentialLoopEnd,
    /// Visit the slots once, then loop on the remainder slot.
    SequentialFillRemaining,
    /// Pick a slot uniformly at random each iteration.
    Random,
}

/// Deck assembler configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Smallest acceptable deck (default: 60).
    pub min_total: usize,

    /// Largest acceptable deck (default: 60).
    pub max_total: usize,

    /// Slot visiting order.
    pub iteration_policy: IterationPolicy,

    /// Maximum copies of one card (0 = unlimited, default: 4).
    pub copy_threshold: usize,

    /// Share of the excess over `min_total` removed by the trim filter.
    pub trim_fraction: f64,

    /// Consecutive iterations without progress before giving up.
    pub max_iterations: usize,

    /// Random seed used by `DeckAssembler::assemble_seeded`.
    pub seed: u64,

    /// Case-sensitive string equality in every query.
    pub strict_case: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            min_total: 60,
            max_total: 60,
            iteration_policy: IterationPolicy::SequentialLoopEnd,
            copy_threshold: 4,
            trim_fraction: 0.0,
            max_iterations: 10_000,
            seed: 42,
            strict_case: false,
        }
    }
}

impl AssemblerConfig {
    /// Set both deck size bounds.
    #[must_use]
    pub fn with_deck_size(mut self, min_total: usize, max_total: usize) -> Self {
        self.min_total = min_total;
        self.max_total = max_total;
        self
    }

    #[must_use]
    pub fn with_iteration_policy(mut self, policy: IterationPolicy) -> Self {
        self.iteration_policy = policy;
        self
    }

    #[must_use]
    pub fn with_copy_threshold(mut self, threshold: usize) -> Self {
        self.copy_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_trim_fraction(mut self, fraction: f64) -> Self {
        self.trim_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_strict_case(mut self, strict: bool) -> Self {
        self.strict_case = strict;
        self
    }

    /// Evaluation options derived from this config.
    #[must_use]
    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            strict_case: self.strict_case,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AssemblerConfig::default();
        assert_eq!(config.min_total, 60);
        assert_eq!(config.max_total, 60);
        assert_eq!(config.copy_threshold, 4);
        assert_eq!(config.trim_fraction, 0.0);
        assert_eq!(config.iteration_policy, IterationPolicy::SequentialLoopEnd);
        assert!(!config.eval_options().strict_case);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AssemblerConfig::default()
            .with_deck_size(40, 45)
            .with_iteration_policy(IterationPolicy::Random)
            .with_copy_threshold(1)
            .with_seed(7)
            .with_strict_case(true);

        assert_eq!((config.min_total, config.max_total), (40, 45));
        assert_eq!(config.iteration_policy, IterationPolicy::Random);
        assert_eq!(config.copy_threshold, 1);
        assert_eq!(config.seed, 7);
        assert!(config.eval_options().strict_case);
    }

    #[test]
    fn test_serialization() {
        let config = AssemblerConfig::default().with_trim_fraction(0.5);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AssemblerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);

        let partial: AssemblerConfig = serde_json::from_str(r#"{"min_total": 40}"#).unwrap();
        assert_eq!(partial.min_total, 40);
        assert_eq!(partial.max_total, 60);
    }
}
