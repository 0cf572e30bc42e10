//! Error types for query parsing, selection, assembly and recipes.
//!
//! Evaluation itself never fails: a predicate whose operands cannot be
//! compared under its relation simply does not match.

use thiserror::Error;

/// Malformed query text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QuerySyntaxError {
    /// The query contained nothing but whitespace.
    #[error("query is empty")]
    EmptyQuery,

    /// The first token of a simple expression is not a known field alias.
    #[error("unknown field alias `{0}`")]
    UnknownField(String),

    /// The relation token of a simple expression is not a known relation.
    #[error("unknown relation `{0}`")]
    UnknownRelation(String),

    /// A simple expression needs at least a field, a relation and a value.
    #[error("expected field, relation and value in `{segment}`, found {found} token(s)")]
    TooFewTokens { segment: String, found: usize },

    /// `[` without a matching `]` or the reverse.
    #[error("unbalanced brackets")]
    UnbalancedBrackets,

    /// An operator or bracket with nothing to apply to.
    #[error("expected an expression at token {position}")]
    MissingOperand { position: usize },

    /// Two expressions next to each other without `&&` or `||`.
    #[error("expected `&&` or `||` at token {position}")]
    MissingOperator { position: usize },
}

/// A selection slot could not pick cards.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SelectionError {
    /// Weighted sampling needs a positive total weight.
    #[error("random-by-point-weight selection needs a positive score total, got {total}")]
    NonPositiveWeightTotal { total: f64 },

    /// A percentage quantity was resolved without a deck size.
    #[error("percentage quantity requires an expected deck size")]
    MissingDeckSize,

    /// Quantity bounds with `min > max`.
    #[error("invalid quantity range {min}..={max}")]
    InvalidQuantity { min: f64, max: f64 },
}

/// The assembler could not build a deck.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AssemblyError {
    /// No slots were configured.
    #[error("assembler has no slots")]
    NoSlots,

    /// `min_total > max_total`.
    #[error("invalid deck size range {min_total}..={max_total}")]
    InvalidDeckSize { min_total: usize, max_total: usize },

    /// Too many consecutive iterations added nothing to the deck.
    #[error(
        "deck stalled at {total} of {min_total} cards after {iterations} fruitless iterations"
    )]
    Unsatisfiable {
        iterations: usize,
        total: usize,
        min_total: usize,
    },

    /// A slot failed while selecting.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Loading or building a deck recipe failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("query `{query}` is invalid: {source}")]
    Query {
        query: String,
        #[source]
        source: QuerySyntaxError,
    },

    #[error("invalid recipe: {0}")]
    Invalid(String),
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Query(#[from] QuerySyntaxError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_messages() {
        let err = QuerySyntaxError::UnknownField("colour".into());
        assert_eq!(err.to_string(), "unknown field alias `colour`");

        let err = QuerySyntaxError::TooFewTokens {
            segment: "cmc >".into(),
            found: 2,
        };
        assert!(err.to_string().contains("found 2 token(s)"));
    }

    #[test]
    fn test_selection_error_converts_into_assembly_error() {
        let err: AssemblyError = SelectionError::MissingDeckSize.into();
        assert_eq!(err, AssemblyError::Selection(SelectionError::MissingDeckSize));
        assert_eq!(
            err.to_string(),
            "percentage quantity requires an expected deck size"
        );
    }

    #[test]
    fn test_top_level_error_from() {
        let err: Error = AssemblyError::NoSlots.into();
        assert!(matches!(err, Error::Assembly(AssemblyError::NoSlots)));
    }
}
