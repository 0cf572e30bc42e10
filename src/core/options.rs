//! Evaluation options shared by every query evaluation.

use serde::{Deserialize, Serialize};

/// Options that change how predicates compare values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Compare strings case-sensitively in `=` and `!=`.
    ///
    /// Regex relations are always case-insensitive.
    #[serde(default)]
    pub strict_case: bool,
}

impl EvalOptions {
    /// Options with case-sensitive string equality.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict_case: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_case_insensitive() {
        assert!(!EvalOptions::default().strict_case);
        assert!(EvalOptions::strict().strict_case);
    }
}
