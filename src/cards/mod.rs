//! Record model: field values, keys, and card records.
//!
//! ## Key Types
//!
//! - `CardRecord`: Accessor trait every queryable record implements
//! - `CardId`: Record identity for merging and blacklists
//! - `FilterKey` / `SortKey`: Which attribute a query or sort reads
//! - `FieldValue`: A resolved attribute value
//! - `CardInfo`: Bundled record type with Scryfall-style fields

pub mod attributes;
pub mod definition;
pub mod keys;

pub use attributes::{format_number, parse_number, FieldValue};
pub use definition::{
    CardId, CardInfo, CardRecord, Color, Format, Legalities, Legality, Rarity,
};
pub use keys::{FilterKey, KeyModifier, SortKey};
