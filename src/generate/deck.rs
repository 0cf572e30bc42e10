//! Generated decks.
//!
//! A `Deck` maps card identity to a quantity. Adding a card already in the
//! deck merges into its entry; an entry whose quantity reaches zero is
//! removed, never kept at zero. Entries keep their insertion order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardRecord};
use crate::core::EvalOptions;
use crate::query::{QueryEvaluator, QueryTree};

/// One card and its number of copies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardId,
    pub quantity: usize,
}

/// Quantity-per-card collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DeckEntry>", into = "Vec<DeckEntry>")]
pub struct Deck {
    entries: Vec<DeckEntry>,
    index: FxHashMap<CardId, usize>,
}

impl Deck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add copies of a card, returning its new quantity.
    pub fn add(&mut self, card: CardId, quantity: usize) -> usize {
        if quantity == 0 {
            return self.quantity(card);
        }
        match self.index.get(&card) {
            Some(&i) => {
                self.entries[i].quantity += quantity;
                self.entries[i].quantity
            }
            None => {
                self.index.insert(card, self.entries.len());
                self.entries.push(DeckEntry { card, quantity });
                quantity
            }
        }
    }

    /// Remove up to `count` copies, returning how many were removed.
    pub fn remove_copies(&mut self, card: CardId, count: usize) -> usize {
        let Some(&i) = self.index.get(&card) else {
            return 0;
        };
        let removed = count.min(self.entries[i].quantity);
        self.entries[i].quantity -= removed;
        if self.entries[i].quantity == 0 {
            self.entries.remove(i);
            self.reindex();
        }
        removed
    }

    /// Lower a card's quantity to at most `max`, returning copies removed.
    pub fn cap(&mut self, card: CardId, max: usize) -> usize {
        let excess = self.quantity(card).saturating_sub(max);
        self.remove_copies(card, excess)
    }

    /// Copies of a card, 0 when absent.
    #[must_use]
    pub fn quantity(&self, card: CardId) -> usize {
        self.index
            .get(&card)
            .map_or(0, |&i| self.entries[i].quantity)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.index.contains_key(&card)
    }

    /// Total number of physical copies.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Number of distinct cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter()
    }

    /// One id per physical copy, in entry order.
    #[must_use]
    pub fn flatten(&self) -> Vec<CardId> {
        self.entries
            .iter()
            .flat_map(|e| std::iter::repeat(e.card).take(e.quantity))
            .collect()
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.card, i))
            .collect();
    }
}

impl From<Vec<DeckEntry>> for Deck {
    fn from(entries: Vec<DeckEntry>) -> Self {
        let mut deck = Deck::new();
        for entry in entries {
            deck.add(entry.card, entry.quantity);
        }
        deck
    }
}

impl From<Deck> for Vec<DeckEntry> {
    fn from(deck: Deck) -> Self {
        deck.entries
    }
}

/// A card that failed deck validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationFailure {
    pub card: CardId,
    /// First rule the card fails; `None` when the card is not among the
    /// supplied records.
    pub query_index: Option<usize>,
}

/// Check every card of a deck against every rule.
///
/// Reports each failing card once, with the first rule it fails.
pub fn validate<R: CardRecord>(
    deck: &Deck,
    records: &[R],
    rules: &[QueryTree],
    options: EvalOptions,
) -> Vec<ValidationFailure> {
    let by_id: FxHashMap<CardId, &R> = records.iter().map(|r| (r.card_id(), r)).collect();
    let evaluators: Vec<QueryEvaluator<'_>> = rules
        .iter()
        .map(|rule| QueryEvaluator::new(rule, options))
        .collect();

    deck.entries()
        .filter_map(|entry| {
            let query_index = match by_id.get(&entry.card) {
                Some(record) => evaluators.iter().position(|e| !e.matches(*record))?,
                None => {
                    return Some(ValidationFailure {
                        card: entry.card,
                        query_index: None,
                    })
                }
            };
            Some(ValidationFailure {
                card: entry.card,
                query_index: Some(query_index),
            })
        })
        .collect()
}
