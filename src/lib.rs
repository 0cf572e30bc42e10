//! # ccg-deckgen
//!
//! Query-driven deck generation over trading card metadata.
//!
//! ## Design Principles
//!
//! 1. **Record-Agnostic**: Everything runs against the `CardRecord` trait.
//!    `CardInfo` is one implementation, not a requirement.
//!
//! 2. **Explicit State**: Randomness comes from a caller-supplied `DeckRng`
//!    and comparison modes from `EvalOptions`. Nothing is global.
//!
//! 3. **Fail Closed, Fail Loud**: Predicates that cannot compare their
//!    operands do not match. Malformed queries and unsatisfiable decks are
//!    errors returned to the caller.
//!
//! ## Pipeline
//!
//! ```text
//! query text ──parse──> QueryTree ──evaluate──> matching records
//!                                        │
//! SortDescriptor ──score──> per-record scores
//!                                        ▼
//!                    SelectionSlot ──select──> picks
//!                                        ▼
//!                    DeckAssembler ──assemble──> Deck
//! ```
//!
//! ## Modules
//!
//! - `core`: Errors, evaluation options, deterministic RNG
//! - `cards`: Record model, field keys and field values
//! - `query`: Query language parser and evaluator
//! - `sort`: Rank-based scoring
//! - `generate`: Selection slots, deck assembly, preference generation
//! - `config`: TOML deck recipes

pub mod cards;
pub mod config;
pub mod core;
pub mod generate;
pub mod query;
pub mod sort;

// Re-export commonly used types
pub use crate::core::{
    AssemblyError, ConfigError, DeckRng, Error, EvalOptions, QuerySyntaxError,
    Result, SelectionError,
};

pub use crate::cards::{
    CardId, CardInfo, CardRecord, Color, FieldValue, FilterKey, Format, KeyModifier, Legality,
    Rarity, SortKey,
};

pub use crate::query::{
    evaluate, parse, Predicate, QueryEvaluator, QueryNode, QueryTree, SetRelation, ValueRelation,
};

pub use crate::sort::{score, SortDescriptor, SortDirection};

pub use crate::generate::{
    generate_from_preferences, validate, AssemblerConfig, CardRatios, Deck, DeckAssembler,
    DeckEntry, DeckPreferences, IterationPolicy, SelectionPolicy, SelectionSlot, SlotQuantity,
    TieBreak, ValidationFailure,
};

pub use crate::config::{DeckRecipe, FilterRecipe, SlotRecipe};
