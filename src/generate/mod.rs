//! Deck generation.
//!
//! ## Overview
//!
//! - [`SelectionSlot`]: Scores records with weighted filters and sort
//!   descriptors, then picks a bounded quantity of them
//! - [`DeckAssembler`]: Visits slots until the deck reaches its target size,
//!   capping copies and optionally trimming the excess
//! - [`Deck`]: The result, a quantity per card identity
//! - [`generate_from_preferences`]: Slot-free generation from colors and
//!   category ratios
//!
//! ## Usage
//!
//! ```rust
//! use ccg_deckgen::cards::{CardId, CardInfo};
//! use ccg_deckgen::core::DeckRng;
//! use ccg_deckgen::generate::{
//!     AssemblerConfig, DeckAssembler, SelectionPolicy, SelectionSlot, SlotQuantity,
//! };
//! use ccg_deckgen::query::parse;
//!
//! let cards: Vec<CardInfo> = (0..20)
//!     .map(|i| CardInfo::new(CardId::new(i), format!("Card {i}"), "Creature"))
//!     .collect();
//!
//! let assembler = DeckAssembler::new(AssemblerConfig::default().with_deck_size(10, 10))
//!     .with_slot(
//!         SelectionSlot::new(SlotQuantity::exactly(5))
//!             .with_policy(SelectionPolicy::MostPoints)
//!             .with_filter(parse("t = creature").unwrap(), 10),
//!     );
//!
//! let deck = assembler.assemble(&cards, &mut DeckRng::new(1)).unwrap();
//! assert_eq!(deck.total(), 10);
//! ```

pub mod assembler;
pub mod config;
pub mod deck;
pub mod preferences;
pub mod slot;

pub use assembler::DeckAssembler;
pub use config::{AssemblerConfig, IterationPolicy};
pub use deck::{validate, Deck, DeckEntry, ValidationFailure};
pub use preferences::{color_exclusion, generate_from_preferences, CardRatios, DeckPreferences};
pub use slot::{SelectionPolicy, SelectionSlot, SlotQuantity, TieBreak};
