//! Deck recipes.
//!
//! Load assembler configurations from TOML so slot setups can change
//! without code changes. Query strings in a recipe are parsed when the
//! recipe is built; a bad query is reported with its text.

pub mod recipe;

pub use recipe::{DeckRecipe, FilterRecipe, SlotRecipe};
