//! Alias and relation tables.
//!
//! One static table per vocabulary, read in both directions: parsing
//! looks up a token, rendering looks up the first alias of a value.
//! The first entry for each value is its canonical spelling.

use crate::cards::{FilterKey, Format, KeyModifier};

use super::ast::ValueRelation;

/// Field aliases, canonical spelling first for each key.
pub const FIELD_ALIASES: &[(&str, FilterKey)] = &[
    ("arenaid", FilterKey::ArenaId),
    ("artist", FilterKey::Artist),
    ("art", FilterKey::Artist),
    ("bordercolor", FilterKey::BorderColor),
    ("border", FilterKey::BorderColor),
    ("cmc", FilterKey::Cmc),
    ("convertedmanacost", FilterKey::Cmc),
    ("collectornumber", FilterKey::CollectorNumber),
    ("coloridentity", FilterKey::ColorIdentity),
    ("cid", FilterKey::ColorIdentity),
    ("colorindicator", FilterKey::ColorIndicator),
    ("cin", FilterKey::ColorIndicator),
    ("colors", FilterKey::Colors),
    ("color", FilterKey::Colors),
    ("c", FilterKey::Colors),
    ("colorshifted", FilterKey::Colorshifted),
    ("digital", FilterKey::Digital),
    ("edhrank", FilterKey::EdhrecRank),
    ("flavortext", FilterKey::FlavorText),
    ("flavor", FilterKey::FlavorText),
    ("foil", FilterKey::Foil),
    ("frame", FilterKey::Frame),
    ("f", FilterKey::Frame),
    ("fullart", FilterKey::FullArt),
    ("futureshifted", FilterKey::Futureshifted),
    ("handmodifier", FilterKey::HandModifier),
    ("hm", FilterKey::HandModifier),
    ("id", FilterKey::Id),
    ("illustrationid", FilterKey::IllustrationId),
    ("lang", FilterKey::Lang),
    ("layout", FilterKey::Layout),
    ("l", FilterKey::Layout),
    ("brawl", FilterKey::Legal(Format::Brawl)),
    ("commander", FilterKey::Legal(Format::Commander)),
    ("duel", FilterKey::Legal(Format::Duel)),
    ("1v1", FilterKey::Legal(Format::Duel)),
    ("frontier", FilterKey::Legal(Format::Frontier)),
    ("future", FilterKey::Legal(Format::Future)),
    ("legacy", FilterKey::Legal(Format::Legacy)),
    ("modern", FilterKey::Legal(Format::Modern)),
    ("pauper", FilterKey::Legal(Format::Pauper)),
    ("penny", FilterKey::Legal(Format::Penny)),
    ("standard", FilterKey::Legal(Format::Standard)),
    ("vintage", FilterKey::Legal(Format::Vintage)),
    ("lifemodifier", FilterKey::LifeModifier),
    ("lm", FilterKey::LifeModifier),
    ("loyalty", FilterKey::Loyalty),
    ("manacost", FilterKey::ManaCost),
    ("mc", FilterKey::ManaCost),
    ("mtgofoilid", FilterKey::MtgoFoilId),
    ("mtgoid", FilterKey::MtgoId),
    ("name", FilterKey::Name),
    ("n", FilterKey::Name),
    ("nonfoil", FilterKey::Nonfoil),
    ("oracleid", FilterKey::OracleId),
    ("oracletext", FilterKey::OracleText),
    ("oversized", FilterKey::Oversized),
    ("power", FilterKey::Power),
    ("p", FilterKey::Power),
    ("printedname", FilterKey::PrintedName),
    ("printedtext", FilterKey::PrintedText),
    ("printedtypeline", FilterKey::PrintedTypeLine),
    ("rarity", FilterKey::Rarity),
    ("r", FilterKey::Rarity),
    ("reprint", FilterKey::Reprint),
    ("reserved", FilterKey::Reserved),
    ("set", FilterKey::Set),
    ("s", FilterKey::Set),
    ("setname", FilterKey::SetName),
    ("sn", FilterKey::SetName),
    ("storyspotlightnumber", FilterKey::StorySpotlightNumber),
    ("subtypes", FilterKey::SubTypes),
    ("st", FilterKey::SubTypes),
    ("timeshifted", FilterKey::Timeshifted),
    ("toughness", FilterKey::Toughness),
    ("tn", FilterKey::Toughness),
    ("typeline", FilterKey::TypeLine),
    ("types", FilterKey::Types),
    ("t", FilterKey::Types),
    ("watermark", FilterKey::Watermark),
];

/// Relation symbols.
pub const RELATIONS: &[(&str, ValueRelation)] = &[
    ("=", ValueRelation::Equal),
    ("!=", ValueRelation::NotEqual),
    (">", ValueRelation::GreaterThan),
    (">=", ValueRelation::GreaterOrEqual),
    ("<", ValueRelation::LessThan),
    ("<=", ValueRelation::LessOrEqual),
    ("includes", ValueRelation::RegexInclude),
    ("excludes", ValueRelation::RegexExclude),
];

/// Key modifiers. `KeyModifier::None` has no spelling.
pub const MODIFIERS: &[(&str, KeyModifier)] = &[("count", KeyModifier::Count)];

fn lookup<T: Copy>(table: &[(&str, T)], token: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token.trim()))
        .map(|(_, value)| *value)
}

fn spelling<T: PartialEq>(table: &[(&'static str, T)], value: &T) -> Option<&'static str> {
    table.iter().find(|(_, v)| v == value).map(|(name, _)| *name)
}

/// Resolve a field alias, ignoring case.
#[must_use]
pub fn field_from_alias(token: &str) -> Option<FilterKey> {
    lookup(FIELD_ALIASES, token)
}

/// Canonical alias of a field.
#[must_use]
pub fn alias_of(key: FilterKey) -> &'static str {
    // Every key has at least one alias; see the table tests.
    spelling(FIELD_ALIASES, &key).unwrap_or("name")
}

/// Resolve a relation symbol, ignoring case.
#[must_use]
pub fn relation_from_symbol(token: &str) -> Option<ValueRelation> {
    lookup(RELATIONS, token)
}

/// Symbol of a relation.
#[must_use]
pub fn symbol_of(relation: ValueRelation) -> &'static str {
    spelling(RELATIONS, &relation).unwrap_or("=")
}

/// Resolve a key modifier, ignoring case.
#[must_use]
pub fn modifier_from_str(token: &str) -> Option<KeyModifier> {
    lookup(MODIFIERS, token)
}

/// Spelling of a modifier, `None` for `KeyModifier::None`.
#[must_use]
pub fn modifier_spelling(modifier: KeyModifier) -> Option<&'static str> {
    spelling(MODIFIERS, &modifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_case_insensitively() {
        assert_eq!(field_from_alias("CMC"), Some(FilterKey::Cmc));
        assert_eq!(field_from_alias("convertedManaCost"), Some(FilterKey::Cmc));
        assert_eq!(field_from_alias("c"), Some(FilterKey::Colors));
        assert_eq!(field_from_alias("1v1"), Some(FilterKey::Legal(Format::Duel)));
        assert_eq!(field_from_alias("colour"), None);
    }

    #[test]
    fn test_every_alias_round_trips_through_canonical() {
        for (alias, key) in FIELD_ALIASES {
            let canonical = alias_of(*key);
            assert_eq!(field_from_alias(canonical), Some(*key), "alias {alias}");
        }
    }

    #[test]
    fn test_aliases_are_unique() {
        for (i, (a, _)) in FIELD_ALIASES.iter().enumerate() {
            for (b, _) in &FIELD_ALIASES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_canonical_spelling() {
        assert_eq!(alias_of(FilterKey::Cmc), "cmc");
        assert_eq!(alias_of(FilterKey::Legal(Format::Duel)), "duel");
        assert_eq!(alias_of(FilterKey::SubTypes), "subtypes");
    }

    #[test]
    fn test_relations() {
        for (symbol, relation) in RELATIONS {
            assert_eq!(relation_from_symbol(symbol), Some(*relation));
            assert_eq!(symbol_of(*relation), *symbol);
        }
        assert_eq!(relation_from_symbol("INCLUDES"), Some(ValueRelation::RegexInclude));
        assert_eq!(relation_from_symbol("=="), None);
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(modifier_from_str("Count"), Some(KeyModifier::Count));
        assert_eq!(modifier_from_str("="), None);
        assert_eq!(modifier_spelling(KeyModifier::Count), Some("count"));
        assert_eq!(modifier_spelling(KeyModifier::None), None);
    }
}
