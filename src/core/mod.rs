//! Core types: errors, evaluation options, deterministic RNG.
//!
//! Nothing here is global: options and the RNG are values passed to
//! each operation.

pub mod error;
pub mod options;
pub mod rng;

pub use error::{AssemblyError, ConfigError, Error, QuerySyntaxError, Result, SelectionError};
pub use options::EvalOptions;
pub use rng::DeckRng;
