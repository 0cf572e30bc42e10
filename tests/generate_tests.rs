//! Integration tests for scoring, selection slots, deck assembly,
//! preference generation and recipes.

use ccg_deckgen::cards::{CardId, CardInfo, Color, SortKey};
use ccg_deckgen::config::DeckRecipe;
use ccg_deckgen::core::{AssemblyError, DeckRng, EvalOptions, SelectionError};
use ccg_deckgen::generate::{
    generate_from_preferences, validate, AssemblerConfig, CardRatios, DeckAssembler,
    DeckPreferences, IterationPolicy, SelectionPolicy, SelectionSlot, SlotQuantity,
};
use ccg_deckgen::query::parse;
use ccg_deckgen::sort::{score, SortDescriptor};

fn creatures(count: u32) -> Vec<CardInfo> {
    (0..count)
        .map(|i| {
            CardInfo::new(CardId::new(i), format!("Creature {i}"), "Creature — Beast")
                .with_mana_cost("{G}", f64::from(i % 6))
                .with_colors([Color::G])
                .with_edhrec_rank(i + 1)
        })
        .collect()
}

fn refs(cards: &[CardInfo]) -> Vec<&CardInfo> {
    cards.iter().collect()
}

// =============================================================================
// Sort Scoring
// =============================================================================

#[test]
fn test_least_direction_rewards_small_values() {
    let cards = vec![
        CardInfo::new(CardId::new(0), "A", "Creature").with_edhrec_rank(1),
        CardInfo::new(CardId::new(1), "B", "Creature").with_edhrec_rank(2),
        CardInfo::new(CardId::new(2), "C", "Creature").with_edhrec_rank(4),
        CardInfo::new(CardId::new(3), "D", "Creature"),
    ];
    let scores = score(&SortDescriptor::least(SortKey::EdhrecRank, 100.0), &cards);

    assert_eq!(scores.len(), 3);
    assert_eq!(scores[&CardId::new(0)], 75.0);
    assert_eq!(scores[&CardId::new(1)], 50.0);
    assert_eq!(scores[&CardId::new(2)], 0.0);
    assert!(!scores.contains_key(&CardId::new(3)));
}

#[test]
fn test_empty_input_scores_nothing() {
    let cards: Vec<CardInfo> = Vec::new();
    assert!(score(&SortDescriptor::most(SortKey::Cmc, 10.0), &cards).is_empty());
}

// =============================================================================
// Selection Slots
// =============================================================================

#[test]
fn test_filter_weights_accumulate() {
    let cards = vec![
        CardInfo::new(CardId::new(0), "X", "Creature").with_colors([Color::R]),
        CardInfo::new(CardId::new(1), "Y", "Creature"),
    ];
    let slot = SelectionSlot::new(SlotQuantity::exactly(1))
        .with_policy(SelectionPolicy::MostPoints)
        .with_filter(parse("t = creature").unwrap(), 10)
        .with_filter(parse("colors = {R}").unwrap(), 10);

    let pool = refs(&cards);
    assert_eq!(slot.score(&pool, EvalOptions::default()), vec![20.0, 10.0]);

    let mut rng = DeckRng::new(3);
    let picks = slot
        .select(&pool, None, &mut rng, EvalOptions::default())
        .unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].name, "X");
}

#[test]
fn test_most_points_is_deterministic() {
    let cards = creatures(12);
    let slot = SelectionSlot::new(SlotQuantity::exactly(4))
        .with_policy(SelectionPolicy::MostPoints)
        .with_sort(SortDescriptor::least(SortKey::EdhrecRank, 100.0));
    let pool = refs(&cards);

    let first = slot
        .select(&pool, None, &mut DeckRng::new(1), EvalOptions::default())
        .unwrap();
    let second = slot
        .select(&pool, None, &mut DeckRng::new(99), EvalOptions::default())
        .unwrap();

    let names: Vec<&str> = first.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Creature 0", "Creature 1", "Creature 2", "Creature 3"]);
    assert_eq!(
        first.iter().map(|c| c.card_id).collect::<Vec<_>>(),
        second.iter().map(|c| c.card_id).collect::<Vec<_>>()
    );
}

#[test]
fn test_weighted_selection_never_repeats() {
    let cards = creatures(30);
    let slot = SelectionSlot::new(SlotQuantity::Fixed { min: 10, max: 20 })
        .with_filter(parse("t = creature").unwrap(), 5);
    let pool = refs(&cards);
    let mut rng = DeckRng::new(17);

    for _ in 0..20 {
        let picks = slot
            .select(&pool, None, &mut rng, EvalOptions::default())
            .unwrap();
        assert!((10..=20).contains(&picks.len()));
        let mut ids: Vec<u32> = picks.iter().map(|c| c.card_id.raw()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), picks.len());
    }
}

#[test]
fn test_blacklisted_records_are_never_picked() {
    let cards = creatures(5);
    let slot = SelectionSlot::new(SlotQuantity::exactly(5))
        .with_filter(parse("t = creature").unwrap(), 1)
        .with_blacklist([CardId::new(0), CardId::new(4)]);

    let picks = slot
        .select(&refs(&cards), None, &mut DeckRng::new(2), EvalOptions::default())
        .unwrap();
    assert_eq!(picks.len(), 3);
    assert!(picks
        .iter()
        .all(|c| c.card_id != CardId::new(0) && c.card_id != CardId::new(4)));
}

#[test]
fn test_weighted_selection_without_positive_scores_fails() {
    let cards = creatures(5);
    let slot = SelectionSlot::new(SlotQuantity::exactly(2))
        .with_filter(parse("t = creature").unwrap(), -3);

    let result = slot.select(&refs(&cards), None, &mut DeckRng::new(2), EvalOptions::default());
    assert_eq!(
        result.map(|picks| picks.len()),
        Err(SelectionError::NonPositiveWeightTotal { total: -15.0 })
    );
}

#[test]
fn test_percent_quantity_needs_deck_size() {
    let cards = creatures(5);
    let slot = SelectionSlot::new(SlotQuantity::Percent { min: 10.0, max: 20.0 })
        .with_filter(parse("t = creature").unwrap(), 1);

    let result = slot.select(&refs(&cards), None, &mut DeckRng::new(2), EvalOptions::default());
    assert_eq!(
        result.map(|picks| picks.len()),
        Err(SelectionError::MissingDeckSize)
    );
}

// =============================================================================
// Deck Assembly
// =============================================================================

#[test]
fn test_single_slot_fills_deck() {
    let cards = creatures(70);
    let assembler = DeckAssembler::new(
        AssemblerConfig::default()
            .with_deck_size(60, 60)
            .with_iteration_policy(IterationPolicy::SequentialLoopEnd)
            .with_copy_threshold(4),
    )
    .with_slot(
        SelectionSlot::new(SlotQuantity::exactly(60))
            .with_filter(parse("t = creature").unwrap(), 1),
    );

    let deck = assembler.assemble(&cards, &mut DeckRng::new(8)).unwrap();
    assert_eq!(deck.total(), 60);
    assert!(deck.entries().all(|e| e.quantity <= 4));
}

#[test]
fn test_percent_slot_runs_until_full() {
    let cards = creatures(100);
    let assembler = DeckAssembler::new(
        AssemblerConfig::default()
            .with_deck_size(40, 40)
            .with_copy_threshold(1),
    )
    .with_slot(
        SelectionSlot::new(SlotQuantity::Percent { min: 50.0, max: 50.0 })
            .with_policy(SelectionPolicy::MostPoints)
            .with_sort(SortDescriptor::least(SortKey::EdhrecRank, 100.0)),
    );

    let deck = assembler.assemble_seeded(&cards).unwrap();
    assert_eq!(deck.total(), 40);
    assert_eq!(deck.len(), 40);
    let mut ids: Vec<u32> = deck.entries().map(|e| e.card.raw()).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..40).collect::<Vec<_>>());
}

#[test]
fn test_remainder_slot_tops_up() {
    let cards = creatures(20);
    let assembler = DeckAssembler::new(
        AssemblerConfig::default()
            .with_deck_size(10, 10)
            .with_iteration_policy(IterationPolicy::SequentialFillRemaining)
            .with_copy_threshold(1),
    )
    .with_slot(
        SelectionSlot::new(SlotQuantity::exactly(3))
            .with_policy(SelectionPolicy::MostPoints)
            .with_filter(parse("cmc = 0").unwrap(), 10),
    )
    .with_remainder_slot(
        SelectionSlot::new(SlotQuantity::exactly(1)).with_policy(SelectionPolicy::MostPoints),
    );

    let deck = assembler.assemble(&cards, &mut DeckRng::new(4)).unwrap();
    assert_eq!(deck.total(), 10);
    assert_eq!(deck.len(), 10);
    for zero_cost in [0, 6, 12] {
        assert!(deck.contains(CardId::new(zero_cost)));
    }
}

#[test]
fn test_small_pool_is_unsatisfiable() {
    let cards = creatures(3);
    let assembler = DeckAssembler::new(
        AssemblerConfig::default()
            .with_deck_size(5, 5)
            .with_copy_threshold(1)
            .with_max_iterations(10),
    )
    .with_slot(
        SelectionSlot::new(SlotQuantity::exactly(2)).with_policy(SelectionPolicy::MostPoints),
    );

    assert_eq!(
        assembler.assemble(&cards, &mut DeckRng::new(1)),
        Err(AssemblyError::Unsatisfiable {
            iterations: 10,
            total: 3,
            min_total: 5,
        })
    );
}

#[test]
fn test_inactive_slot_stalls() {
    let cards = creatures(10);
    let assembler = DeckAssembler::new(
        AssemblerConfig::default()
            .with_deck_size(5, 5)
            .with_max_iterations(25),
    )
    .with_slot(
        SelectionSlot::new(SlotQuantity::exactly(5))
            .with_policy(SelectionPolicy::MostPoints)
            .with_activation_chance(0.0),
    );

    assert!(matches!(
        assembler.assemble(&cards, &mut DeckRng::new(1)),
        Err(AssemblyError::Unsatisfiable { total: 0, .. })
    ));
}

#[test]
fn test_selection_errors_propagate() {
    let cards = creatures(10);
    let assembler = DeckAssembler::new(AssemblerConfig::default().with_deck_size(5, 5))
        .with_slot(SelectionSlot::new(SlotQuantity::exactly(5)));

    assert!(matches!(
        assembler.assemble(&cards, &mut DeckRng::new(1)),
        Err(AssemblyError::Selection(SelectionError::NonPositiveWeightTotal { .. }))
    ));
}

#[test]
fn test_assembled_deck_passes_slot_rules() {
    let cards = creatures(50);
    let rule = parse("[t = creature] && [cmc <= 2]").unwrap();
    let assembler = DeckAssembler::new(AssemblerConfig::default().with_deck_size(20, 20))
        .with_slot(SelectionSlot::new(SlotQuantity::exactly(4)).with_filter(rule.clone(), 1))
        .with_slot(
            SelectionSlot::new(SlotQuantity::exactly(4))
                .with_filter(parse("cmc = 0").unwrap(), 1),
        );

    let deck = assembler.assemble(&cards, &mut DeckRng::new(21)).unwrap();
    assert_eq!(deck.total(), 20);
    assert!(validate(&deck, &cards, &[rule], EvalOptions::default()).is_empty());
}

// =============================================================================
// Preference Generation
// =============================================================================

#[test]
fn test_preferences_pick_on_color_ranked_cards() {
    let mut cards = vec![
        CardInfo::new(CardId::new(100), "Mountain", "Basic Land — Mountain"),
        CardInfo::new(CardId::new(101), "Island", "Basic Land — Island"),
        CardInfo::new(CardId::new(102), "Blue Creature", "Creature")
            .with_colors([Color::U])
            .with_edhrec_rank(1),
        CardInfo::new(CardId::new(103), "Unranked Creature", "Creature").with_colors([Color::R]),
    ];
    for i in 0..5 {
        cards.push(
            CardInfo::new(CardId::new(i), format!("Red Creature {i}"), "Creature")
                .with_colors([Color::R])
                .with_edhrec_rank(10 + i),
        );
    }

    let prefs = DeckPreferences::default()
        .with_colors([Color::R])
        .with_ratios(CardRatios::AVERAGE);
    let mut rng = DeckRng::new(6);
    let deck = generate_from_preferences(&cards, &prefs, &mut rng, EvalOptions::default());

    assert_eq!(deck.quantity(CardId::new(100)), 20);
    assert!(!deck.contains(CardId::new(101)));
    assert!(!deck.contains(CardId::new(102)));
    assert!(!deck.contains(CardId::new(103)));
    for i in 0..5 {
        assert_eq!(deck.quantity(CardId::new(i)), 1);
    }
    assert_eq!(deck.total(), 25);
}

// =============================================================================
// Recipes
// =============================================================================

#[test]
fn test_recipe_builds_working_assembler() {
    let recipe = DeckRecipe::from_toml_str(
        r#"
        [assembler]
        min_total = 12
        max_total = 12
        copy_threshold = 2
        seed = 5

        [[slots]]
        quantity = { fixed = { min = 2, max = 3 } }

        [[slots.filters]]
        query = "[t = creature] && [cmc <= 3]"
        weight = 10

        [[slots.sorts]]
        key = "edhrec_rank"
        direction = "least"
        score_pool = 50.0
        "#,
    )
    .unwrap();

    let cards = creatures(30);
    let assembler = recipe.build().unwrap();
    let deck = assembler.assemble_seeded(&cards).unwrap();
    assert_eq!(deck.total(), 12);
    assert!(deck.entries().all(|e| e.quantity <= 2));
    assert_eq!(deck, assembler.assemble_seeded(&cards).unwrap());
}
