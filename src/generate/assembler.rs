//! Deck assembly.
//!
//! The assembler visits its slots according to the iteration policy and
//! adds the records each slot picks until the deck reaches `min_total`,
//! never exceeding `max_total`. Copy caps shrink the candidate pool as the
//! deck fills up. Once the minimum is met an optional trim filter removes
//! a share of the excess copies.
//!
//! Assembly fails with `AssemblyError::Unsatisfiable` after
//! `max_iterations` consecutive iterations that add nothing.

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::cards::{CardId, CardRecord};
use crate::core::{AssemblyError, DeckRng, EvalOptions};
use crate::query::{QueryEvaluator, QueryTree};

use super::config::{AssemblerConfig, IterationPolicy};
use super::deck::Deck;
use super::slot::SelectionSlot;

/// Which slot rotation the assembler is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rotation {
    /// Index of the last slot visited.
    Slots(Option<usize>),
    /// Looping on the remainder slot.
    Remainder,
}

/// Drives selection slots to build one deck.
#[derive(Clone, Debug, Default)]
pub struct DeckAssembler {
    config: AssemblerConfig,
    slots: Vec<SelectionSlot>,
    remainder: Option<SelectionSlot>,
    trim_filter: Option<QueryTree>,
}

impl DeckAssembler {
    /// Create an assembler without slots.
    #[must_use]
    pub fn new(config: AssemblerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append a slot to the rotation.
    #[must_use]
    pub fn with_slot(mut self, slot: SelectionSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Slot used by `SequentialFillRemaining` once the rotation is done.
    ///
    /// Its quantity is replaced by the number of cards still missing.
    #[must_use]
    pub fn with_remainder_slot(mut self, slot: SelectionSlot) -> Self {
        self.remainder = Some(slot);
        self
    }

    /// Filter whose matches are removed from the excess after assembly.
    #[must_use]
    pub fn with_trim_filter(mut self, filter: QueryTree) -> Self {
        self.trim_filter = Some(filter);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    #[must_use]
    pub fn slots(&self) -> &[SelectionSlot] {
        &self.slots
    }

    #[must_use]
    pub fn remainder_slot(&self) -> Option<&SelectionSlot> {
        self.remainder.as_ref()
    }

    #[must_use]
    pub fn trim_filter(&self) -> Option<&QueryTree> {
        self.trim_filter.as_ref()
    }

    /// Assemble with a generator seeded from the config.
    pub fn assemble_seeded<R: CardRecord>(&self, records: &[R]) -> Result<Deck, AssemblyError> {
        let mut rng = DeckRng::new(self.config.seed);
        self.assemble(records, &mut rng)
    }

    /// Assemble a deck from `records`.
    pub fn assemble<R: CardRecord>(
        &self,
        records: &[R],
        rng: &mut DeckRng,
    ) -> Result<Deck, AssemblyError> {
        let AssemblerConfig {
            min_total,
            max_total,
            copy_threshold,
            ..
        } = self.config;
        if self.slots.is_empty() {
            return Err(AssemblyError::NoSlots);
        }
        if min_total > max_total {
            return Err(AssemblyError::InvalidDeckSize {
                min_total,
                max_total,
            });
        }

        let options = self.config.eval_options();
        let mut pool: Vec<&R> = records.iter().collect();
        let mut deck = Deck::new();
        let mut total = 0;
        let mut rotation = Rotation::Slots(None);
        let mut iterations = 0usize;
        let mut fruitless = 0usize;

        debug!(
            event = "assembly_start",
            slots = self.slots.len(),
            pool = pool.len(),
            min_total,
            max_total,
        );

        while total < min_total {
            if fruitless >= self.config.max_iterations {
                warn!(
                    event = "assembly_stalled",
                    iterations = fruitless,
                    total,
                    min_total,
                );
                return Err(AssemblyError::Unsatisfiable {
                    iterations: fruitless,
                    total,
                    min_total,
                });
            }
            iterations += 1;

            if copy_threshold > 0 {
                pool.retain(|r| deck.quantity(r.card_id()) < copy_threshold);
            }

            rotation = self.advance(rotation, rng);
            let slot = match rotation {
                Rotation::Slots(Some(i)) => &self.slots[i],
                Rotation::Remainder => match &self.remainder {
                    Some(slot) => slot,
                    None => &self.slots[0],
                },
                Rotation::Slots(None) => &self.slots[0],
            };

            if !slot.should_activate(rng) {
                fruitless += 1;
                continue;
            }

            let picks = match rotation {
                Rotation::Remainder => {
                    slot.select_count(&pool, min_total - total, rng, options)?
                }
                Rotation::Slots(_) => slot.select(&pool, Some(min_total), rng, options)?,
            };

            let mut added = 0;
            for record in &picks {
                if total >= max_total {
                    break;
                }
                let card = record.card_id();
                if copy_threshold > 0 && deck.quantity(card) >= copy_threshold {
                    continue;
                }
                deck.add(card, 1);
                total += 1;
                added += 1;
                trace!(event = "card_added", card = card.raw(), total);
            }

            debug!(
                event = "slot_run",
                iteration = iterations,
                picked = picks.len(),
                added,
                total,
            );

            if added == 0 {
                fruitless += 1;
            } else {
                fruitless = 0;
            }
        }

        let trimmed = self.trim(&mut deck, records, options);

        debug!(
            event = "assembly_end",
            iterations,
            total = deck.total(),
            distinct = deck.len(),
            trimmed,
        );
        Ok(deck)
    }

    fn advance(&self, rotation: Rotation, rng: &mut DeckRng) -> Rotation {
        if self.config.iteration_policy == IterationPolicy::Random {
            return Rotation::Slots(rng.choose_index(self.slots.len()));
        }
        match rotation {
            Rotation::Remainder => Rotation::Remainder,
            Rotation::Slots(last) => {
                let next = last.map_or(0, |i| i + 1);
                if next < self.slots.len() {
                    Rotation::Slots(Some(next))
                } else if self.config.iteration_policy == IterationPolicy::SequentialFillRemaining
                    && self.remainder.is_some()
                {
                    Rotation::Remainder
                } else {
                    Rotation::Slots(Some(0))
                }
            }
        }
    }

    /// Remove up to `floor((total - min_total) * trim_fraction)` matching
    /// copies, in deck order. Returns the number removed.
    ///
    /// The fraction is clamped to `0..=1` so a trim never takes the deck
    /// below `min_total`.
    fn trim<R: CardRecord>(&self, deck: &mut Deck, records: &[R], options: EvalOptions) -> usize {
        let Some(filter) = &self.trim_filter else {
            return 0;
        };
        let total = deck.total();
        if total <= self.config.min_total {
            return 0;
        }
        let fraction = self.config.trim_fraction.clamp(0.0, 1.0);
        let budget = ((total - self.config.min_total) as f64 * fraction)
            .floor()
            .max(0.0) as usize;
        if budget == 0 {
            return 0;
        }

        let by_id: FxHashMap<CardId, &R> = records.iter().map(|r| (r.card_id(), r)).collect();
        let copies: Vec<&R> = deck
            .flatten()
            .into_iter()
            .filter_map(|id| by_id.get(&id).copied())
            .collect();
        let matched = QueryEvaluator::new(filter, options).filter(&copies);

        let mut removed = 0;
        for record in matched.into_iter().take(budget) {
            removed += deck.remove_copies(record.card_id(), 1);
            trace!(event = "card_trimmed", card = record.card_id().raw());
        }
        removed
    }
}
