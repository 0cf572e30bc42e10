//! Resolved field values.
//!
//! Every queryable attribute of a record resolves to exactly one
//! `FieldValue`. Queries never see the record itself, only these values.
//!
//! ## FieldValue Types
//!
//! - `Text`: Strings (name, mana cost, type line, legality)
//! - `Number`: Numeric fields (cmc, EDHREC rank)
//! - `Bool`: Flags (reserved, foil)
//! - `List`: Ordered string lists (colors, types, subtypes)
//! - `Absent`: The record has no value for this field

use std::borrow::Cow;

/// Value of a record attribute, borrowed from the record where possible.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue<'a> {
    /// Text value.
    Text(Cow<'a, str>),
    /// Numeric value.
    Number(f64),
    /// Boolean flag.
    Bool(bool),
    /// Ordered list of strings.
    List(Vec<Cow<'a, str>>),
    /// No value.
    Absent,
}

impl<'a> FieldValue<'a> {
    /// Text from an optional string, `Absent` when missing.
    #[must_use]
    pub fn text_opt(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Absent, |s| FieldValue::Text(Cow::Borrowed(s)))
    }

    /// Number from an optional value, `Absent` when missing.
    #[must_use]
    pub fn number_opt(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Number)
    }

    /// String form used by equality and regex relations.
    ///
    /// `None` for `Absent`. Lists join their elements with a space.
    #[must_use]
    pub fn as_string(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_ref())),
            FieldValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            FieldValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            FieldValue::List(items) => Some(Cow::Owned(items.join(" "))),
            FieldValue::Absent => None,
        }
    }

    /// Numeric form: numbers directly, text when it parses as a finite number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Get the list elements if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Cow<'a, str>]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value is `Absent`.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(v: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(v))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(v: String) -> Self {
        FieldValue::Text(Cow::Owned(v))
    }
}

impl From<Vec<String>> for FieldValue<'_> {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v.into_iter().map(Cow::Owned).collect())
    }
}

/// Parse a trimmed string as a finite number.
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number the way it is written in card data: `3`, `2.5`.
#[must_use]
pub fn format_number(n: f64) -> String {
    format!("{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_string() {
        assert_eq!(FieldValue::from("Bolt").as_string().as_deref(), Some("Bolt"));
        assert_eq!(FieldValue::Number(3.0).as_string().as_deref(), Some("3"));
        assert_eq!(FieldValue::Number(2.5).as_string().as_deref(), Some("2.5"));
        assert_eq!(FieldValue::Bool(true).as_string().as_deref(), Some("true"));
        assert_eq!(FieldValue::Absent.as_string(), None);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(FieldValue::Number(4.0).as_number(), Some(4.0));
        assert_eq!(FieldValue::from(" 7 ").as_number(), Some(7.0));
        assert_eq!(FieldValue::from("*").as_number(), None);
        assert_eq!(FieldValue::from("inf").as_number(), None);
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Bool(true).as_number(), None);
        assert_eq!(FieldValue::Absent.as_number(), None);
    }

    #[test]
    fn test_list_access() {
        let value: FieldValue = vec!["{R}".to_string(), "{G}".to_string()].into();
        assert_eq!(value.as_list().map(<[_]>::len), Some(2));
        assert_eq!(FieldValue::from("x").as_list(), None);
    }

    #[test]
    fn test_optional_constructors() {
        assert!(FieldValue::text_opt(None).is_absent());
        assert!(FieldValue::number_opt(None).is_absent());
        assert_eq!(FieldValue::number_opt(Some(1.0)), FieldValue::Number(1.0));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }
}
