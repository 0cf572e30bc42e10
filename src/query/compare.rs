//! Value comparisons used by predicates.
//!
//! All comparisons fail closed: operands that cannot be compared under a
//! relation produce `false`, never an error.

use regex::{Regex, RegexBuilder};

use crate::cards::parse_number;

/// Numeric equality tolerance.
pub const NUMERIC_EPSILON: f64 = 0.001;

/// Equality as queries see it.
///
/// Two numbers are equal within `NUMERIC_EPSILON`. Anything else compares
/// as text, ignoring case unless `strict_case` is set.
#[must_use]
pub fn loosely_equal(field: &str, literal: &str, strict_case: bool) -> bool {
    if let (Some(a), Some(b)) = (parse_number(field), parse_number(literal)) {
        return (a - b).abs() <= NUMERIC_EPSILON;
    }
    if strict_case {
        field == literal
    } else {
        field
            .chars()
            .flat_map(char::to_lowercase)
            .eq(literal.chars().flat_map(char::to_lowercase))
    }
}

/// `>`, `>=`, `<`, `<=` on two numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericRelation {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl NumericRelation {
    #[must_use]
    pub fn holds(self, field: f64, literal: f64) -> bool {
        match self {
            NumericRelation::Greater => field > literal,
            NumericRelation::GreaterOrEqual => field >= literal,
            NumericRelation::Less => field < literal,
            NumericRelation::LessOrEqual => field <= literal,
        }
    }
}

/// Compile an includes/excludes literal as a case-insensitive pattern.
///
/// Braces that do not form a counted repetition are matched literally, so
/// `{R}` finds the red mana symbol. Returns `None` when the pattern does
/// not compile.
#[must_use]
pub fn compile_pattern(literal: &str) -> Option<Regex> {
    RegexBuilder::new(&escape_literal_braces(literal))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Escape `{` and `}` unless they delimit `{n}`, `{n,}` or `{n,m}`
/// following something repeatable.
#[must_use]
pub fn escape_literal_braces(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                out.push('\\');
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                }
                i += 2;
            }
            '{' => match repetition_len(&chars[i..]).filter(|_| repeatable(&chars[..i])) {
                Some(len) => {
                    out.extend(&chars[i..i + len]);
                    i += len;
                }
                None => {
                    out.push_str("\\{");
                    i += 1;
                }
            },
            '}' => {
                out.push_str("\\}");
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn repeatable(before: &[char]) -> bool {
    !matches!(before.last(), None | Some('(' | '|' | '{' | '}'))
}

/// Length of a `{n}`, `{n,}` or `{n,m}` at the start of `chars`.
fn repetition_len(chars: &[char]) -> Option<usize> {
    let digits = |from: usize| chars[from..].iter().take_while(|c| c.is_ascii_digit()).count();

    let mut i = 1;
    let lower = digits(i);
    if lower == 0 {
        return None;
    }
    i += lower;
    if chars.get(i) == Some(&',') {
        i += 1;
        i += digits(i);
    }
    (chars.get(i) == Some(&'}')).then_some(i + 1)
}
