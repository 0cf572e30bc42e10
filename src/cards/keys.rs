//! Field keys for filtering and sorting.
//!
//! `FilterKey` names every attribute a query can test. `SortKey` names the
//! numeric views a sort descriptor can rank by; several of them are
//! derived (symbol counts, color count) rather than stored.

use serde::{Deserialize, Serialize};

use super::definition::{Color, Format};

/// Queryable record attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    ArenaId,
    Artist,
    BorderColor,
    Cmc,
    CollectorNumber,
    ColorIdentity,
    ColorIndicator,
    Colors,
    Colorshifted,
    Digital,
    EdhrecRank,
    FlavorText,
    Foil,
    Frame,
    FullArt,
    Futureshifted,
    HandModifier,
    Id,
    IllustrationId,
    Lang,
    Layout,
    /// Legality in one format.
    Legal(Format),
    LifeModifier,
    Loyalty,
    ManaCost,
    MtgoFoilId,
    MtgoId,
    Name,
    Nonfoil,
    OracleId,
    OracleText,
    Oversized,
    Power,
    PrintedName,
    PrintedText,
    PrintedTypeLine,
    Rarity,
    Reprint,
    Reserved,
    Set,
    SetName,
    StorySpotlightNumber,
    SubTypes,
    Timeshifted,
    Toughness,
    TypeLine,
    Types,
    Watermark,
}

/// How a predicate reads its field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyModifier {
    /// Use the value as-is.
    #[default]
    None,
    /// Use the number of elements of a list field.
    Count,
}

/// Numeric attribute a sort descriptor ranks by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Cmc,
    /// Number of colors.
    ColorsLength,
    EdhrecRank,
    Loyalty,
    /// Occurrences of `{W}` in the mana cost.
    ManaCostWhite,
    ManaCostBlue,
    ManaCostBlack,
    ManaCostRed,
    ManaCostGreen,
    /// The generic (numeric) symbol of the mana cost.
    ManaCostColorless,
    Power,
    /// Rarity ordinal: common 0 .. mythic 3.
    Rarity,
    Toughness,
}

impl SortKey {
    /// The color whose symbols this key counts, if any.
    #[must_use]
    pub const fn symbol_color(self) -> Option<Color> {
        match self {
            SortKey::ManaCostWhite => Some(Color::W),
            SortKey::ManaCostBlue => Some(Color::U),
            SortKey::ManaCostBlack => Some(Color::B),
            SortKey::ManaCostRed => Some(Color::R),
            SortKey::ManaCostGreen => Some(Color::G),
            _ => None,
        }
    }
}
