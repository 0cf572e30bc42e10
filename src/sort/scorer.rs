//! Rank-based scoring.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardRecord, SortKey};

/// Which end of the ranking receives the score pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest values score highest.
    Least,
    /// Largest values score highest.
    #[default]
    Most,
}

/// Distributes a score pool over records by one numeric attribute.
///
/// With `max` the largest value among scored records, `Most` gives
/// `pool * value / max` and `Least` gives `pool * (max - value) / max`.
/// Records whose attribute is not a finite number get no score at all.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
    pub score_pool: f64,
}

impl SortDescriptor {
    /// Create a new descriptor.
    #[must_use]
    pub fn new(key: SortKey, direction: SortDirection, score_pool: f64) -> Self {
        Self {
            key,
            direction,
            score_pool,
        }
    }

    /// Shorthand for a `Most` descriptor.
    #[must_use]
    pub fn most(key: SortKey, score_pool: f64) -> Self {
        Self::new(key, SortDirection::Most, score_pool)
    }

    /// Shorthand for a `Least` descriptor.
    #[must_use]
    pub fn least(key: SortKey, score_pool: f64) -> Self {
        Self::new(key, SortDirection::Least, score_pool)
    }

    /// Score every eligible record.
    pub fn score<R: CardRecord + ?Sized>(&self, records: &[&R]) -> FxHashMap<CardId, f64> {
        let values: Vec<(CardId, f64)> = records
            .iter()
            .filter_map(|r| r.sort_field(self.key).as_number().map(|v| (r.card_id(), v)))
            .collect();

        let Some(max) = values.iter().map(|(_, v)| *v).reduce(f64::max) else {
            return FxHashMap::default();
        };

        values
            .into_iter()
            .map(|(id, value)| (id, self.score_value(value, max)))
            .collect()
    }

    /// Score a single value against a known maximum.
    #[must_use]
    pub fn score_value(&self, value: f64, max: f64) -> f64 {
        if max == 0.0 {
            return 0.0;
        }
        match self.direction {
            SortDirection::Most => self.score_pool * value / max,
            SortDirection::Least => self.score_pool * (max - value) / max,
        }
    }
}

/// Score records with a descriptor.
pub fn score<R: CardRecord>(descriptor: &SortDescriptor, records: &[R]) -> FxHashMap<CardId, f64> {
    let refs: Vec<&R> = records.iter().collect();
    descriptor.score(&refs)
}
