//! TOML deck recipes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::ConfigError;
use crate::generate::{
    AssemblerConfig, DeckAssembler, SelectionPolicy, SelectionSlot, SlotQuantity, TieBreak,
};
use crate::query::{parse, QueryTree};
use crate::sort::SortDescriptor;

/// A query with the points it awards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterRecipe {
    pub query: String,
    pub weight: i64,
}

/// Declarative form of a `SelectionSlot`.
///
/// Missing fields take the `SelectionSlot` defaults, including the
/// `random_by_point_weight` policy. That policy only draws records with a
/// positive score, so a slot (or `[remainder]`) with no filters or sorts
/// must set `policy = "most_points"` to select anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotRecipe {
    pub filters: Vec<FilterRecipe>,
    pub sorts: Vec<SortDescriptor>,
    pub quantity: SlotQuantity,
    pub policy: SelectionPolicy,
    pub tie_break: TieBreak,
    pub tie_threshold: f64,
    pub activation_chance: f64,
    pub blacklist: Vec<u32>,
}

impl Default for SlotRecipe {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            quantity: SlotQuantity::default(),
            policy: SelectionPolicy::default(),
            tie_break: TieBreak::default(),
            tie_threshold: 0.0,
            activation_chance: 1.0,
            blacklist: Vec::new(),
        }
    }
}

impl SlotRecipe {
    /// Parse the filters and build the slot.
    pub fn build(&self) -> Result<SelectionSlot, ConfigError> {
        if !(0.0..=1.0).contains(&self.activation_chance) {
            return Err(ConfigError::Invalid(format!(
                "activation_chance must be within 0..=1, got {}",
                self.activation_chance
            )));
        }
        if !self.tie_threshold.is_finite() || self.tie_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tie_threshold must be a non-negative number, got {}",
                self.tie_threshold
            )));
        }

        let mut slot = SelectionSlot::new(self.quantity)
            .with_policy(self.policy)
            .with_tie_break(self.tie_break)
            .with_tie_threshold(self.tie_threshold)
            .with_activation_chance(self.activation_chance)
            .with_blacklist(self.blacklist.iter().copied().map(CardId::new));
        for filter in &self.filters {
            slot = slot.with_filter(parse_query(&filter.query)?, filter.weight);
        }
        for sort in &self.sorts {
            slot = slot.with_sort(*sort);
        }
        Ok(slot)
    }
}

/// A complete assembler description.
///
/// ```
/// use ccg_deckgen::config::DeckRecipe;
///
/// let recipe = DeckRecipe::from_toml_str(r#"
///     trim = "t includes land"
///
///     [assembler]
///     min_total = 40
///     max_total = 40
///
///     [[slots]]
///     quantity = { fixed = { min = 2, max = 4 } }
///     policy = "most_points"
///
///     [[slots.filters]]
///     query = "[t = creature] && [cmc <= 3]"
///     weight = 10
///
///     [[slots.sorts]]
///     key = "edhrec_rank"
///     direction = "least"
///     score_pool = 100.0
/// "#).unwrap();
///
/// let assembler = recipe.build().unwrap();
/// assert_eq!(assembler.slots().len(), 1);
/// assert_eq!(assembler.config().min_total, 40);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckRecipe {
    pub assembler: AssemblerConfig,
    pub slots: Vec<SlotRecipe>,
    /// Slot that fills the gap under `sequential_fill_remaining`.
    pub remainder: Option<SlotRecipe>,
    /// Query selecting copies to remove from the excess.
    pub trim: Option<String>,
}

impl DeckRecipe {
    /// Loads a recipe from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a recipe from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Validate the recipe and build its assembler.
    pub fn build(&self) -> Result<DeckAssembler, ConfigError> {
        let config = &self.assembler;
        if self.slots.is_empty() {
            return Err(ConfigError::Invalid("recipe has no slots".to_string()));
        }
        if config.min_total > config.max_total {
            return Err(ConfigError::Invalid(format!(
                "min_total {} exceeds max_total {}",
                config.min_total, config.max_total
            )));
        }
        if !(0.0..=1.0).contains(&config.trim_fraction) {
            return Err(ConfigError::Invalid(format!(
                "trim_fraction must be within 0..=1, got {}",
                config.trim_fraction
            )));
        }

        let mut assembler = DeckAssembler::new(config.clone());
        for slot in &self.slots {
            assembler = assembler.with_slot(slot.build()?);
        }
        if let Some(remainder) = &self.remainder {
            assembler = assembler.with_remainder_slot(remainder.build()?);
        }
        if let Some(trim) = &self.trim {
            assembler = assembler.with_trim_filter(parse_query(trim)?);
        }
        Ok(assembler)
    }
}

fn parse_query(query: &str) -> Result<QueryTree, ConfigError> {
    parse(query).map_err(|source| ConfigError::Query {
        query: query.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SortKey;
    use crate::core::QuerySyntaxError;
    use crate::generate::IterationPolicy;
    use crate::sort::SortDirection;

    const RECIPE: &str = r#"
        trim = "t includes land"

        [assembler]
        min_total = 60
        max_total = 64
        iteration_policy = "sequential_fill_remaining"
        copy_threshold = 4
        trim_fraction = 0.5
        seed = 9

        [[slots]]
        quantity = { percent = { min = 30.0, max = 40.0 } }
        tie_break = { ascending = "edhrec_rank" }
        tie_threshold = 2.0
        activation_chance = 0.75
        blacklist = [3, 4]

        [[slots.filters]]
        query = "t = creature"
        weight = 10

        [[slots.sorts]]
        key = "cmc"
        direction = "least"
        score_pool = 50.0

        [remainder]
        policy = "most_points"
    "#;

    #[test]
    fn test_parse_recipe() {
        let recipe = DeckRecipe::from_toml_str(RECIPE).unwrap();
        assert_eq!(recipe.assembler.max_total, 64);
        assert_eq!(
            recipe.assembler.iteration_policy,
            IterationPolicy::SequentialFillRemaining
        );
        assert_eq!(recipe.assembler.max_iterations, 10_000);

        let slot = &recipe.slots[0];
        assert_eq!(slot.quantity, SlotQuantity::Percent { min: 30.0, max: 40.0 });
        assert_eq!(slot.tie_break, TieBreak::Ascending(SortKey::EdhrecRank));
        assert_eq!(slot.policy, SelectionPolicy::RandomByPointWeight);
        assert_eq!(slot.sorts[0].direction, SortDirection::Least);
        assert_eq!(slot.blacklist, vec![3, 4]);

        let remainder = recipe.remainder.as_ref().unwrap();
        assert_eq!(remainder.policy, SelectionPolicy::MostPoints);
        assert_eq!(remainder.activation_chance, 1.0);
    }

    #[test]
    fn test_build_recipe() {
        let assembler = DeckRecipe::from_toml_str(RECIPE).unwrap().build().unwrap();
        assert_eq!(assembler.slots().len(), 1);
        assert!(assembler.remainder_slot().is_some());
        assert_eq!(
            assembler.trim_filter().map(ToString::to_string).as_deref(),
            Some("types includes land")
        );

        let slot = &assembler.slots()[0];
        assert_eq!(slot.filters.len(), 1);
        assert_eq!(slot.filters[0].1, 10);
        assert!(slot.blacklist.contains(&CardId::new(4)));
    }

    #[test]
    fn test_bad_query_is_reported() {
        let recipe = DeckRecipe::from_toml_str(
            r#"
            [[slots]]
            [[slots.filters]]
            query = "colour = red"
            weight = 1
            "#,
        )
        .unwrap();
        match recipe.build() {
            Err(ConfigError::Query { query, source }) => {
                assert_eq!(query, "colour = red");
                assert_eq!(source, QuerySyntaxError::UnknownField("colour".to_string()));
            }
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_recipes() {
        assert!(matches!(
            DeckRecipe::default().build(),
            Err(ConfigError::Invalid(_))
        ));

        let inverted = DeckRecipe::from_toml_str(
            r#"
            [assembler]
            min_total = 61
            max_total = 60
            [[slots]]
            "#,
        )
        .unwrap();
        assert!(matches!(inverted.build(), Err(ConfigError::Invalid(_))));

        let chance = DeckRecipe::from_toml_str(
            r#"
            [[slots]]
            activation_chance = 1.5
            "#,
        )
        .unwrap();
        assert!(matches!(chance.build(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_syntax_error() {
        assert!(matches!(
            DeckRecipe::from_toml_str("[[slots]"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            DeckRecipe::load("/nonexistent/recipe.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
