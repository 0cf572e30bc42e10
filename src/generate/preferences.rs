//! Preference-driven generation.
//!
//! Builds a deck straight from a color choice and a land/creature/
//! permanent/spell ratio, without configuring slots: basic lands for each
//! color, then the best-ranked on-color cards of each category.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::cards::{CardRecord, Color, FieldValue, FilterKey, SortKey};
use crate::core::{DeckRng, EvalOptions};
use crate::query::{
    NodeId, Predicate, QueryEvaluator, QueryTree, QueryTreeBuilder, SetRelation, ValueRelation,
};
use crate::sort::SortDescriptor;

use super::deck::Deck;

/// Pool for ranking candidates by EDHREC rank.
pub const EDHREC_SCORE_POOL: f64 = 40_000.0;

/// Land used when a deck has no colors.
pub const COLORLESS_BASIC: &str = "Wastes";

/// Relative share of each card category.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardRatios {
    pub lands: f64,
    pub creatures: f64,
    /// Artifacts, enchantments and planeswalkers that are not creatures.
    pub other_permanents: f64,
    /// Instants and sorceries.
    pub nonpermanents: f64,
}

impl CardRatios {
    pub const AVERAGE: Self = Self::new(20.0, 20.0, 12.0, 8.0);
    pub const LOW_LANDS: Self = Self::new(15.0, 23.0, 12.0, 10.0);
    pub const HIGH_LANDS: Self = Self::new(25.0, 19.0, 10.0, 6.0);
    pub const HIGH_NON_PERMANENT: Self = Self::new(20.0, 14.0, 10.0, 16.0);
    pub const LOW_NON_PERMANENT: Self = Self::new(20.0, 25.0, 13.0, 2.0);

    #[must_use]
    pub const fn new(
        lands: f64,
        creatures: f64,
        other_permanents: f64,
        nonpermanents: f64,
    ) -> Self {
        Self {
            lands,
            creatures,
            other_permanents,
            nonpermanents,
        }
    }

    /// Sum of all shares.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lands + self.creatures + self.other_permanents + self.nonpermanents
    }

    /// Number of cards a share amounts to in a deck of `deck_size`.
    #[must_use]
    pub fn count(&self, share: f64, deck_size: usize) -> usize {
        let total = self.total();
        if total <= 0.0 {
            return 0;
        }
        (share * deck_size as f64 / total).floor().max(0.0) as usize
    }
}

impl Default for CardRatios {
    fn default() -> Self {
        Self::AVERAGE
    }
}

/// What a preference-driven deck should look like.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckPreferences {
    /// Deck colors; empty means colorless.
    pub colors: Vec<Color>,
    pub ratios: CardRatios,
    pub deck_size: usize,
}

impl Default for DeckPreferences {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            ratios: CardRatios::AVERAGE,
            deck_size: 60,
        }
    }
}

impl DeckPreferences {
    /// Random ratios and colors.
    ///
    /// One deck in eight is colorless. Otherwise a first color is drawn,
    /// a second with chance 1/3, a third with chance 1/4, and from three
    /// colors the deck grows to five (3/4) or four (1/4) with chance 2/3.
    pub fn random(rng: &mut DeckRng) -> Self {
        let ratios = match rng.gen_range_usize(0..6) {
            0 | 1 => CardRatios::AVERAGE,
            2 => CardRatios::HIGH_LANDS,
            3 => CardRatios::LOW_LANDS,
            4 => CardRatios::HIGH_NON_PERMANENT,
            _ => CardRatios::LOW_NON_PERMANENT,
        };

        let mut remaining = Color::ALL.to_vec();
        let mut colors = Vec::new();
        let mut draw = |rng: &mut DeckRng, colors: &mut Vec<Color>| {
            if let Some(i) = rng.choose_index(remaining.len()) {
                colors.push(remaining.remove(i));
            }
        };

        if rng.gen_range_usize(0..8) > 0 {
            draw(rng, &mut colors);
            if rng.gen_range_usize(0..3) == 0 {
                draw(rng, &mut colors);
                if rng.gen_range_usize(0..4) == 0 {
                    draw(rng, &mut colors);
                    if rng.gen_range_usize(0..3) != 0 {
                        draw(rng, &mut colors);
                        if rng.gen_range_usize(0..4) != 0 {
                            draw(rng, &mut colors);
                        }
                    }
                }
            }
        }

        Self {
            colors,
            ratios,
            deck_size: 60,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self.colors.sort();
        self.colors.dedup();
        self
    }

    #[must_use]
    pub fn with_ratios(mut self, ratios: CardRatios) -> Self {
        self.ratios = ratios;
        self
    }

    #[must_use]
    pub fn with_deck_size(mut self, deck_size: usize) -> Self {
        self.deck_size = deck_size;
        self
    }
}

/// Query rejecting cards whose color identity leaves `colors`.
///
/// `None` when every color is allowed.
#[must_use]
pub fn color_exclusion(colors: &[Color]) -> Option<QueryTree> {
    let mut builder = QueryTreeBuilder::new();
    let excluded: SmallVec<[NodeId; 4]> = Color::ALL
        .iter()
        .filter(|c| !colors.contains(c))
        .map(|c| {
            builder.predicate(Predicate::new(
                FilterKey::ColorIdentity,
                ValueRelation::NotEqual,
                c.symbol(),
            ))
        })
        .collect();
    if excluded.is_empty() {
        return None;
    }
    let root = builder.compound(excluded, SetRelation::Intersect);
    Some(builder.finish(root))
}

fn type_is(builder: &mut QueryTreeBuilder, relation: ValueRelation, name: &str) -> NodeId {
    builder.predicate(Predicate::new(FilterKey::Types, relation, name))
}

fn creatures() -> QueryTree {
    QueryTree::predicate(Predicate::new(
        FilterKey::Types,
        ValueRelation::Equal,
        "Creature",
    ))
}

fn other_permanents() -> QueryTree {
    let mut b = QueryTreeBuilder::new();
    let not_creature = type_is(&mut b, ValueRelation::NotEqual, "Creature");
    let kinds = ["Enchantment", "Artifact", "Planeswalker"]
        .iter()
        .map(|name| type_is(&mut b, ValueRelation::Equal, name))
        .collect();
    let any_kind = b.compound(kinds, SetRelation::Union);
    let root = b.compound(SmallVec::from_slice(&[not_creature, any_kind]), SetRelation::Intersect);
    b.finish(root)
}

fn nonpermanents() -> QueryTree {
    let mut b = QueryTreeBuilder::new();
    let instant = type_is(&mut b, ValueRelation::Equal, "Instant");
    let sorcery = type_is(&mut b, ValueRelation::Equal, "Sorcery");
    let root = b.compound(SmallVec::from_slice(&[instant, sorcery]), SetRelation::Union);
    b.finish(root)
}

/// Generate a deck from preferences.
///
/// Basic lands are split evenly between the colors (Wastes when
/// colorless). Each other category takes its share of the deck from the
/// on-color cards of that category, ranked by EDHREC rank with random
/// jitter; cards without a rank are never chosen.
pub fn generate_from_preferences<R: CardRecord>(
    records: &[R],
    preferences: &DeckPreferences,
    rng: &mut DeckRng,
    options: EvalOptions,
) -> Deck {
    let mut deck = Deck::new();
    let ratios = &preferences.ratios;
    let size = preferences.deck_size;

    let mut lands = ratios.count(ratios.lands, size);
    if !preferences.colors.is_empty() {
        lands /= preferences.colors.len();
    }
    let basics: Vec<&str> = if preferences.colors.is_empty() {
        vec![COLORLESS_BASIC]
    } else {
        preferences.colors.iter().map(|c| c.basic_land()).collect()
    };
    for basic in basics {
        let found = records
            .iter()
            .find(|r| matches!(r.field(FilterKey::Name), FieldValue::Text(name) if name == basic));
        match found {
            Some(record) => {
                deck.add(record.card_id(), lands);
            }
            None => debug!(event = "basic_land_missing", name = basic),
        }
    }

    let exclusion = color_exclusion(&preferences.colors);
    let refs: Vec<&R> = records.iter().collect();
    for (category, share) in [
        (creatures(), ratios.creatures),
        (other_permanents(), ratios.other_permanents),
        (nonpermanents(), ratios.nonpermanents),
    ] {
        let query = match &exclusion {
            Some(exclusion) => category.join(SetRelation::Intersect, exclusion),
            None => category,
        };
        let candidates = QueryEvaluator::new(&query, options).filter(&refs);
        let ranks = SortDescriptor::most(SortKey::EdhrecRank, EDHREC_SCORE_POOL).score(&candidates);

        let mut ranked: Vec<(f64, &R)> = candidates
            .into_iter()
            .filter_map(|r| {
                let score = ranks.get(&r.card_id())?;
                let jitter = rng.gen_range_usize(0..EDHREC_SCORE_POOL as usize) as f64;
                Some((score / 10.0 + jitter, r))
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, record) in ranked.into_iter().take(ratios.count(share, size)) {
            deck.add(record.card_id(), 1);
        }
    }

    debug!(
        event = "preferences_generated",
        colors = preferences.colors.len(),
        total = deck.total(),
    );
    deck
}
