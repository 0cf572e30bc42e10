//! Selection slots.
//!
//! A slot scores every eligible record and picks a bounded number of
//! them. A record's score is the sum of
//!
//! - every sort descriptor's score for it (0 when the descriptor skips it)
//! - the weight of every filter whose match set contains it
//!
//! Weights may be negative, so scores may be too.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cards::{CardId, CardRecord, SortKey};
use crate::core::{DeckRng, EvalOptions, SelectionError};
use crate::query::{QueryEvaluator, QueryTree};
use crate::sort::SortDescriptor;

/// How many records a slot picks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotQuantity {
    /// Uniform in `min..=max`.
    Fixed { min: usize, max: usize },
    /// Percentages (0-100) of the expected deck size.
    Percent { min: f64, max: f64 },
}

impl SlotQuantity {
    /// Exactly `n` records.
    #[must_use]
    pub const fn exactly(n: usize) -> Self {
        SlotQuantity::Fixed { min: n, max: n }
    }

    /// Draw a concrete count.
    ///
    /// Percentages resolve to `floor(min% * size) + uniform(0..=d)` with
    /// `d = floor(max% * size) - floor(min% * size)`.
    pub fn resolve(
        &self,
        expected_size: Option<usize>,
        rng: &mut DeckRng,
    ) -> Result<usize, SelectionError> {
        match *self {
            SlotQuantity::Fixed { min, max } => {
                if min > max {
                    return Err(SelectionError::InvalidQuantity {
                        min: min as f64,
                        max: max as f64,
                    });
                }
                Ok(rng.gen_range_inclusive(min, max))
            }
            SlotQuantity::Percent { min, max } => {
                if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
                    return Err(SelectionError::InvalidQuantity { min, max });
                }
                let size = expected_size.ok_or(SelectionError::MissingDeckSize)? as f64;
                let low = (min * size / 100.0).floor() as usize;
                let high = (max * size / 100.0).floor() as usize;
                Ok(low + rng.gen_range_inclusive(0, high.saturating_sub(low)))
            }
        }
    }
}

impl Default for SlotQuantity {
    fn default() -> Self {
        SlotQuantity::exactly(1)
    }
}

/// How a slot turns scores into picks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Highest scores first, with an optional tie window.
    MostPoints,
    /// Weighted sampling without replacement.
    ///
    /// Only records with a positive score can be drawn. When no record in
    /// the pool scores above zero the slot fails with
    /// `SelectionError::NonPositiveWeightTotal`, so a slot without filters
    /// or sorts (including `SelectionSlot::default()`) needs `MostPoints`
    /// to pick anything.
    #[default]
    RandomByPointWeight,
}

/// How `MostPoints` chooses among records inside the tie window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Uniformly at random.
    #[default]
    Random,
    /// Smallest value of a sort key first; non-numeric values last.
    Ascending(SortKey),
}

/// Configured rule that scores and picks records.
#[derive(Clone, Debug)]
pub struct SelectionSlot {
    pub filters: Vec<(QueryTree, i64)>,
    pub sorts: Vec<SortDescriptor>,
    pub quantity: SlotQuantity,
    pub policy: SelectionPolicy,
    pub tie_break: TieBreak,
    /// Scores within this distance of the best are tied (`MostPoints`).
    pub tie_threshold: f64,
    /// Records never picked by this slot.
    pub blacklist: FxHashSet<CardId>,
    /// Probability in `0..=1` that the slot runs when visited.
    pub activation_chance: f64,
}

impl Default for SelectionSlot {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            quantity: SlotQuantity::default(),
            policy: SelectionPolicy::default(),
            tie_break: TieBreak::default(),
            tie_threshold: 0.0,
            blacklist: FxHashSet::default(),
            activation_chance: 1.0,
        }
    }
}

impl SelectionSlot {
    /// A slot picking `quantity` records.
    #[must_use]
    pub fn new(quantity: SlotQuantity) -> Self {
        Self {
            quantity,
            ..Self::default()
        }
    }

    /// Add a weighted filter.
    #[must_use]
    pub fn with_filter(mut self, query: QueryTree, weight: i64) -> Self {
        self.filters.push((query, weight));
        self
    }

    /// Add a sort descriptor.
    #[must_use]
    pub fn with_sort(mut self, sort: SortDescriptor) -> Self {
        self.sorts.push(sort);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    #[must_use]
    pub fn with_tie_threshold(mut self, threshold: f64) -> Self {
        self.tie_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_activation_chance(mut self, chance: f64) -> Self {
        self.activation_chance = chance;
        self
    }

    /// Exclude records from this slot.
    #[must_use]
    pub fn with_blacklist(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.blacklist.extend(cards);
        self
    }

    /// Coin flip deciding whether the slot runs on this visit.
    pub fn should_activate(&self, rng: &mut DeckRng) -> bool {
        self.activation_chance >= 1.0 || rng.gen_bool(self.activation_chance)
    }

    /// Score every record. Blacklisted records are not filtered out here.
    pub fn score<R: CardRecord + ?Sized>(
        &self,
        records: &[&R],
        options: EvalOptions,
    ) -> Vec<f64> {
        let mut scores = vec![0.0; records.len()];

        for sort in &self.sorts {
            let sorted: FxHashMap<CardId, f64> = sort.score(records);
            for (score, record) in scores.iter_mut().zip(records) {
                *score += sorted.get(&record.card_id()).copied().unwrap_or(0.0);
            }
        }

        for (query, weight) in &self.filters {
            let mask = QueryEvaluator::new(query, options).evaluate_mask(records);
            for (score, matched) in scores.iter_mut().zip(mask) {
                if matched {
                    *score += *weight as f64;
                }
            }
        }

        scores
    }

    /// Pick records from `records`.
    ///
    /// `expected_size` is the deck size percentages resolve against.
    /// Returns fewer records than requested when the pool runs out.
    pub fn select<'r, R: CardRecord + ?Sized>(
        &self,
        records: &[&'r R],
        expected_size: Option<usize>,
        rng: &mut DeckRng,
        options: EvalOptions,
    ) -> Result<Vec<&'r R>, SelectionError> {
        let count = self.quantity.resolve(expected_size, rng)?;
        self.select_count(records, count, rng, options)
    }

    /// Pick `count` records, bypassing the configured quantity.
    pub fn select_count<'r, R: CardRecord + ?Sized>(
        &self,
        records: &[&'r R],
        count: usize,
        rng: &mut DeckRng,
        options: EvalOptions,
    ) -> Result<Vec<&'r R>, SelectionError> {
        let pool: Vec<&'r R> = records
            .iter()
            .copied()
            .filter(|r| !self.blacklist.contains(&r.card_id()))
            .collect();
        if pool.is_empty() || count == 0 {
            return Ok(Vec::new());
        }

        let scores = self.score(&pool, options);
        let picks = match self.policy {
            SelectionPolicy::MostPoints => self.most_points(&pool, &scores, count, rng),
            SelectionPolicy::RandomByPointWeight => random_by_weight(scores, count, rng)?,
        };

        trace!(
            event = "slot_selected",
            requested = count,
            picked = picks.len(),
            pool = pool.len(),
        );
        Ok(picks.into_iter().map(|i| pool[i]).collect())
    }

    fn most_points<R: CardRecord + ?Sized>(
        &self,
        pool: &[&R],
        scores: &[f64],
        count: usize,
        rng: &mut DeckRng,
    ) -> Vec<usize> {
        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

        if self.tie_threshold <= 0.0 {
            order.truncate(count);
            return order;
        }

        let mut picks = Vec::with_capacity(count.min(order.len()));
        while picks.len() < count && !order.is_empty() {
            let best = scores[order[0]];
            let tied = order
                .iter()
                .take_while(|i| scores[**i] >= best - self.tie_threshold)
                .count();
            let chosen = match self.tie_break {
                TieBreak::Random => rng.choose_index(tied).unwrap_or(0),
                TieBreak::Ascending(key) => (0..tied)
                    .min_by(|a, b| {
                        let va = sort_value(pool[order[*a]], key);
                        let vb = sort_value(pool[order[*b]], key);
                        va.total_cmp(&vb)
                    })
                    .unwrap_or(0),
            };
            picks.push(order.remove(chosen));
        }
        picks
    }
}

fn sort_value<R: CardRecord + ?Sized>(record: &R, key: SortKey) -> f64 {
    record.sort_field(key).as_number().unwrap_or(f64::INFINITY)
}

/// Weighted draws without replacement over a shuffled pool.
///
/// Negative scores weigh nothing. Fails when no score is positive.
fn random_by_weight(
    scores: Vec<f64>,
    count: usize,
    rng: &mut DeckRng,
) -> Result<Vec<usize>, SelectionError> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    rng.shuffle(&mut order);
    let mut weights: Vec<f64> = order.iter().map(|i| scores[*i].max(0.0)).collect();

    if !weights.iter().any(|w| *w > 0.0) {
        return Err(SelectionError::NonPositiveWeightTotal {
            total: scores.iter().sum(),
        });
    }

    let mut picks = Vec::with_capacity(count.min(order.len()));
    while picks.len() < count {
        let Some(slot) = rng.choose_weighted(&weights) else {
            break;
        };
        weights[slot] = 0.0;
        picks.push(order[slot]);
    }
    Ok(picks)
}
