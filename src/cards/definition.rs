//! Card records - the attribute model queries run against.
//!
//! `CardRecord` is the accessor seam: anything that can resolve a
//! `FilterKey` or `SortKey` to a `FieldValue` can be filtered, ranked and
//! assembled into decks. `CardInfo` is the bundled implementation modelled
//! on Scryfall card objects; deserializing those objects happens outside
//! this crate.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::attributes::FieldValue;
use super::keys::{FilterKey, SortKey};

/// Identity of a record.
///
/// Decks merge copies by this id, blacklists and copy caps use it too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Typed accessor over a record's fields.
pub trait CardRecord {
    /// Identity used for merging, blacklists and copy caps.
    fn card_id(&self) -> CardId;

    /// Resolve a queryable field.
    fn field(&self, key: FilterKey) -> FieldValue<'_>;

    /// Resolve a sortable field.
    fn sort_field(&self, key: SortKey) -> FieldValue<'_>;
}

/// One of the five colors of mana.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
}

impl Color {
    /// All colors in WUBRG order.
    pub const ALL: [Color; 5] = [Color::W, Color::U, Color::B, Color::R, Color::G];

    /// Mana symbol, e.g. `{R}`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Color::W => "{W}",
            Color::U => "{U}",
            Color::B => "{B}",
            Color::R => "{R}",
            Color::G => "{G}",
        }
    }

    /// Single letter, e.g. `R`.
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Color::W => "W",
            Color::U => "U",
            Color::B => "B",
            Color::R => "R",
            Color::G => "G",
        }
    }

    /// Name of the basic land producing this color.
    #[must_use]
    pub const fn basic_land(self) -> &'static str {
        match self {
            Color::W => "Plains",
            Color::U => "Island",
            Color::B => "Swamp",
            Color::R => "Mountain",
            Color::G => "Forest",
        }
    }
}

/// Card rarity. Special printings count as rare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
        }
    }

    /// Ordinal used for sorting.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

/// Formats with legality data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Brawl,
    Commander,
    Duel,
    Frontier,
    Future,
    Legacy,
    Modern,
    Pauper,
    Penny,
    Standard,
    Vintage,
}

/// Legality of a card in one format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legality {
    Legal,
    #[default]
    NotLegal,
    Restricted,
    Banned,
}

impl Legality {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Legality::Legal => "legal",
            Legality::NotLegal => "illegal",
            Legality::Restricted => "restricted",
            Legality::Banned => "banned",
        }
    }
}

/// Per-format legalities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Legalities {
    pub brawl: Legality,
    pub commander: Legality,
    pub duel: Legality,
    pub frontier: Legality,
    pub future: Legality,
    pub legacy: Legality,
    pub modern: Legality,
    pub pauper: Legality,
    pub penny: Legality,
    pub standard: Legality,
    pub vintage: Legality,
}

impl Legalities {
    /// Legality in the given format.
    #[must_use]
    pub fn get(&self, format: Format) -> Legality {
        match format {
            Format::Brawl => self.brawl,
            Format::Commander => self.commander,
            Format::Duel => self.duel,
            Format::Frontier => self.frontier,
            Format::Future => self.future,
            Format::Legacy => self.legacy,
            Format::Modern => self.modern,
            Format::Pauper => self.pauper,
            Format::Penny => self.penny,
            Format::Standard => self.standard,
            Format::Vintage => self.vintage,
        }
    }

    /// Set the legality in one format.
    pub fn set(&mut self, format: Format, legality: Legality) {
        let slot = match format {
            Format::Brawl => &mut self.brawl,
            Format::Commander => &mut self.commander,
            Format::Duel => &mut self.duel,
            Format::Frontier => &mut self.frontier,
            Format::Future => &mut self.future,
            Format::Legacy => &mut self.legacy,
            Format::Modern => &mut self.modern,
            Format::Pauper => &mut self.pauper,
            Format::Penny => &mut self.penny,
            Format::Standard => &mut self.standard,
            Format::Vintage => &mut self.vintage,
        };
        *slot = legality;
    }
}

/// A single printed card.
///
/// ## Example
///
/// ```
/// use ccg_deckgen::cards::{CardId, CardInfo, Color};
///
/// let bolt = CardInfo::new(CardId::new(1), "Lightning Bolt", "Instant")
///     .with_mana_cost("{R}", 1.0)
///     .with_colors([Color::R]);
///
/// assert_eq!(bolt.types(), vec!["Instant"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardInfo {
    pub card_id: CardId,
    pub name: String,
    pub type_line: String,
    pub mana_cost: Option<String>,
    pub cmc: f64,
    pub colors: Vec<Color>,
    pub color_identity: Vec<Color>,
    pub color_indicator: Vec<Color>,
    pub oracle_text: Option<String>,
    pub flavor_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub hand_modifier: Option<String>,
    pub life_modifier: Option<String>,
    pub rarity: Rarity,
    pub set: String,
    pub set_name: String,
    pub collector_number: String,
    pub artist: Option<String>,
    pub watermark: Option<String>,
    pub lang: String,
    pub layout: String,
    pub border_color: String,
    pub frame: String,
    pub printed_name: Option<String>,
    pub printed_text: Option<String>,
    pub printed_type_line: Option<String>,
    pub scryfall_id: Option<String>,
    pub oracle_id: Option<String>,
    pub illustration_id: Option<String>,
    pub arena_id: Option<u32>,
    pub mtgo_id: Option<u32>,
    pub mtgo_foil_id: Option<u32>,
    pub edhrec_rank: Option<u32>,
    pub story_spotlight_number: Option<u32>,
    pub legalities: Legalities,
    pub reserved: bool,
    pub reprint: bool,
    pub digital: bool,
    pub foil: bool,
    pub nonfoil: bool,
    pub full_art: bool,
    pub oversized: bool,
    pub colorshifted: bool,
    pub futureshifted: bool,
    pub timeshifted: bool,
}

impl CardInfo {
    /// Create a card with a name and type line; everything else defaults.
    #[must_use]
    pub fn new(card_id: CardId, name: impl Into<String>, type_line: impl Into<String>) -> Self {
        Self {
            card_id,
            name: name.into(),
            type_line: type_line.into(),
            lang: "en".to_string(),
            layout: "normal".to_string(),
            border_color: "black".to_string(),
            frame: "2015".to_string(),
            nonfoil: true,
            ..Self::default()
        }
    }

    /// Set mana cost and converted mana cost (builder pattern).
    #[must_use]
    pub fn with_mana_cost(mut self, mana_cost: impl Into<String>, cmc: f64) -> Self {
        self.mana_cost = Some(mana_cost.into());
        self.cmc = cmc;
        self
    }

    /// Set colors; color identity follows unless set separately.
    #[must_use]
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        if self.color_identity.is_empty() {
            self.color_identity = self.colors.clone();
        }
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_power_toughness(
        mut self,
        power: impl Into<String>,
        toughness: impl Into<String>,
    ) -> Self {
        self.power = Some(power.into());
        self.toughness = Some(toughness.into());
        self
    }

    #[must_use]
    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_edhrec_rank(mut self, rank: u32) -> Self {
        self.edhrec_rank = Some(rank);
        self
    }

    #[must_use]
    pub fn with_set(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.set = code.into();
        self.set_name = name.into();
        self
    }

    #[must_use]
    pub fn with_legality(mut self, format: Format, legality: Legality) -> Self {
        self.legalities.set(format, legality);
        self
    }

    /// Words of the type line before the dash (`Legendary`, `Creature`).
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        self.type_line
            .split('—')
            .next()
            .map(|head| head.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Words of the type line after the dash (`Goblin`, `Wizard`).
    #[must_use]
    pub fn subtypes(&self) -> Vec<&str> {
        self.type_line
            .split('—')
            .nth(1)
            .map(|tail| tail.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Count of a color's symbol in the mana cost, `None` without a cost.
    #[must_use]
    pub fn symbol_count(&self, color: Color) -> Option<usize> {
        self.mana_cost
            .as_deref()
            .map(|cost| cost.matches(color.symbol()).count())
    }

    /// The generic mana symbol, e.g. `3` in `{3}{R}`.
    #[must_use]
    pub fn generic_mana(&self) -> Option<&str> {
        let cost = self.mana_cost.as_deref()?;
        cost.split('{')
            .filter_map(|part| part.split_once('}').map(|(inner, _)| inner))
            .find(|inner| !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()))
    }
}

fn color_list(colors: &[Color]) -> FieldValue<'static> {
    FieldValue::List(colors.iter().map(|c| Cow::Borrowed(c.symbol())).collect())
}

fn word_list(words: Vec<&str>) -> FieldValue<'_> {
    FieldValue::List(words.into_iter().map(Cow::Borrowed).collect())
}

fn id_opt(value: Option<u32>) -> FieldValue<'static> {
    FieldValue::number_opt(value.map(f64::from))
}

impl CardRecord for CardInfo {
    fn card_id(&self) -> CardId {
        self.card_id
    }

    fn field(&self, key: FilterKey) -> FieldValue<'_> {
        match key {
            FilterKey::ArenaId => id_opt(self.arena_id),
            FilterKey::Artist => FieldValue::text_opt(self.artist.as_deref()),
            FilterKey::BorderColor => self.border_color.as_str().into(),
            FilterKey::Cmc => FieldValue::Number(self.cmc),
            FilterKey::CollectorNumber => self.collector_number.as_str().into(),
            FilterKey::ColorIdentity => color_list(&self.color_identity),
            FilterKey::ColorIndicator => color_list(&self.color_indicator),
            FilterKey::Colors => color_list(&self.colors),
            FilterKey::Colorshifted => self.colorshifted.into(),
            FilterKey::Digital => self.digital.into(),
            FilterKey::EdhrecRank => id_opt(self.edhrec_rank),
            FilterKey::FlavorText => FieldValue::text_opt(self.flavor_text.as_deref()),
            FilterKey::Foil => self.foil.into(),
            FilterKey::Frame => self.frame.as_str().into(),
            FilterKey::FullArt => self.full_art.into(),
            FilterKey::Futureshifted => self.futureshifted.into(),
            FilterKey::HandModifier => FieldValue::text_opt(self.hand_modifier.as_deref()),
            FilterKey::Id => FieldValue::text_opt(self.scryfall_id.as_deref()),
            FilterKey::IllustrationId => FieldValue::text_opt(self.illustration_id.as_deref()),
            FilterKey::Lang => self.lang.as_str().into(),
            FilterKey::Layout => self.layout.as_str().into(),
            FilterKey::Legal(format) => self.legalities.get(format).as_str().into(),
            FilterKey::LifeModifier => FieldValue::text_opt(self.life_modifier.as_deref()),
            FilterKey::Loyalty => FieldValue::text_opt(self.loyalty.as_deref()),
            FilterKey::ManaCost => FieldValue::text_opt(self.mana_cost.as_deref()),
            FilterKey::MtgoFoilId => id_opt(self.mtgo_foil_id),
            FilterKey::MtgoId => id_opt(self.mtgo_id),
            FilterKey::Name => self.name.as_str().into(),
            FilterKey::Nonfoil => self.nonfoil.into(),
            FilterKey::OracleId => FieldValue::text_opt(self.oracle_id.as_deref()),
            FilterKey::OracleText => FieldValue::text_opt(self.oracle_text.as_deref()),
            FilterKey::Oversized => self.oversized.into(),
            FilterKey::Power => FieldValue::text_opt(self.power.as_deref()),
            FilterKey::PrintedName => FieldValue::text_opt(self.printed_name.as_deref()),
            FilterKey::PrintedText => FieldValue::text_opt(self.printed_text.as_deref()),
            FilterKey::PrintedTypeLine => FieldValue::text_opt(self.printed_type_line.as_deref()),
            FilterKey::Rarity => self.rarity.as_str().into(),
            FilterKey::Reprint => self.reprint.into(),
            FilterKey::Reserved => self.reserved.into(),
            FilterKey::Set => self.set.as_str().into(),
            FilterKey::SetName => self.set_name.as_str().into(),
            FilterKey::StorySpotlightNumber => id_opt(self.story_spotlight_number),
            FilterKey::SubTypes => word_list(self.subtypes()),
            FilterKey::Timeshifted => self.timeshifted.into(),
            FilterKey::Toughness => FieldValue::text_opt(self.toughness.as_deref()),
            FilterKey::TypeLine => self.type_line.as_str().into(),
            FilterKey::Types => word_list(self.types()),
            FilterKey::Watermark => FieldValue::text_opt(self.watermark.as_deref()),
        }
    }

    fn sort_field(&self, key: SortKey) -> FieldValue<'_> {
        match key {
            SortKey::Cmc => FieldValue::Number(self.cmc),
            SortKey::ColorsLength => FieldValue::Number(self.colors.len() as f64),
            SortKey::EdhrecRank => id_opt(self.edhrec_rank),
            SortKey::Loyalty => FieldValue::text_opt(self.loyalty.as_deref()),
            SortKey::ManaCostWhite
            | SortKey::ManaCostBlue
            | SortKey::ManaCostBlack
            | SortKey::ManaCostRed
            | SortKey::ManaCostGreen => {
                let count = key
                    .symbol_color()
                    .and_then(|color| self.symbol_count(color));
                FieldValue::number_opt(count.map(|n| n as f64))
            }
            SortKey::ManaCostColorless => FieldValue::text_opt(self.generic_mana()),
            SortKey::Power => FieldValue::text_opt(self.power.as_deref()),
            SortKey::Rarity => FieldValue::Number(f64::from(self.rarity.rank())),
            SortKey::Toughness => FieldValue::text_opt(self.toughness.as_deref()),
        }
    }
}
