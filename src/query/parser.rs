//! Query text parser.
//!
//! Parsing runs in two passes. The structural pass splits the text on
//! `[`, `]`, `&&` and `||`; every non-blank span between them is a simple
//! expression such as `cmc >= 3`. The grouping pass is a recursive descent
//! over those tokens where `&&` binds tighter than `||`:
//!
//! ```text
//! or   := and ( "||" and )*
//! and  := atom ( "&&" atom )*
//! atom := "[" or "]" | expression
//! ```
//!
//! Runs of the same operator become one n-ary compound node, and a group
//! holding a single term collapses to that term.

use smallvec::SmallVec;

use crate::cards::KeyModifier;
use crate::core::QuerySyntaxError;

use super::ast::{NodeId, Predicate, QueryTree, QueryTreeBuilder, SetRelation};
use super::table::{field_from_alias, modifier_from_str, relation_from_symbol};

/// Structural token.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    And,
    Or,
    Expr(&'a str),
}

/// Parse query text into a tree.
pub fn parse(text: &str) -> Result<QueryTree, QuerySyntaxError> {
    let tokens = split_structure(text);
    if tokens.is_empty() {
        return Err(QuerySyntaxError::EmptyQuery);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        builder: QueryTreeBuilder::new(),
    };
    let root = parser.parse_or()?;
    match parser.peek() {
        None => Ok(parser.builder.finish(root)),
        Some(Token::Close) => Err(QuerySyntaxError::UnbalancedBrackets),
        Some(_) => Err(QuerySyntaxError::MissingOperator {
            position: parser.pos,
        }),
    }
}

/// Parse a single simple expression: `<field> [count] <relation> <value>`.
pub fn parse_predicate(segment: &str) -> Result<Predicate, QuerySyntaxError> {
    let tokens = tokenize_expression(segment);
    let too_few = || QuerySyntaxError::TooFewTokens {
        segment: segment.trim().to_string(),
        found: tokens.len(),
    };
    if tokens.len() < 3 {
        return Err(too_few());
    }

    let key = field_from_alias(tokens[0])
        .ok_or_else(|| QuerySyntaxError::UnknownField(tokens[0].to_string()))?;

    let (modifier, rest) = match modifier_from_str(tokens[1]) {
        Some(modifier) if tokens.len() >= 4 => (modifier, &tokens[2..]),
        Some(_) => return Err(too_few()),
        None => (KeyModifier::None, &tokens[1..]),
    };

    let relation = relation_from_symbol(rest[0])
        .ok_or_else(|| QuerySyntaxError::UnknownRelation(rest[0].to_string()))?;

    Ok(Predicate::new(key, relation, rest[1..].concat()).with_modifier(modifier))
}

fn split_structure(text: &str) -> Vec<Token<'_>> {
    fn flush<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Token<'a>>) {
        let span = &text[start..end];
        if !span.trim().is_empty() {
            out.push(Token::Expr(span));
        }
    }

    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let (token, width) = match bytes[i] {
            b'[' => (Some(Token::Open), 1),
            b']' => (Some(Token::Close), 1),
            b'&' if bytes.get(i + 1) == Some(&b'&') => (Some(Token::And), 2),
            b'|' if bytes.get(i + 1) == Some(&b'|') => (Some(Token::Or), 2),
            _ => (None, 1),
        };
        if let Some(token) = token {
            flush(text, start, i, &mut tokens);
            tokens.push(token);
            start = i + width;
        }
        i += width;
    }
    flush(text, start, bytes.len(), &mut tokens);
    tokens
}

/// Split an expression into word runs and symbol runs, dropping whitespace.
fn tokenize_expression(segment: &str) -> Vec<&str> {
    #[derive(PartialEq)]
    enum Class {
        Word,
        Symbol,
        Space,
    }
    let class = |c: char| {
        if c.is_alphanumeric() || c == '_' {
            Class::Word
        } else if c.is_whitespace() {
            Class::Space
        } else {
            Class::Symbol
        }
    };

    let mut tokens = Vec::new();
    let mut run: Option<(usize, Class)> = None;
    for (i, c) in segment.char_indices() {
        let current = class(c);
        match &run {
            Some((_, kind)) if *kind == current => {}
            _ => {
                if let Some((start, kind)) = run.take() {
                    if kind != Class::Space {
                        tokens.push(&segment[start..i]);
                    }
                }
                run = Some((i, current));
            }
        }
    }
    if let Some((start, kind)) = run {
        if kind != Class::Space {
            tokens.push(&segment[start..]);
        }
    }
    tokens
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    builder: QueryTreeBuilder,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn parse_or(&mut self) -> Result<NodeId, QuerySyntaxError> {
        self.parse_chain(Token::Or, SetRelation::Union, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<NodeId, QuerySyntaxError> {
        self.parse_chain(Token::And, SetRelation::Intersect, Self::parse_atom)
    }

    fn parse_chain(
        &mut self,
        operator: Token<'a>,
        relation: SetRelation,
        operand: fn(&mut Self) -> Result<NodeId, QuerySyntaxError>,
    ) -> Result<NodeId, QuerySyntaxError> {
        let mut children: SmallVec<[NodeId; 4]> = SmallVec::new();
        children.push(operand(self)?);
        while self.peek() == Some(&operator) {
            self.pos += 1;
            children.push(operand(self)?);
        }
        Ok(self.builder.compound(children, relation))
    }

    fn parse_atom(&mut self) -> Result<NodeId, QuerySyntaxError> {
        let position = self.pos;
        match self.tokens.get(position).cloned() {
            Some(Token::Open) => {
                self.pos += 1;
                let inner = self.parse_or()?;
                match self.peek() {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    None => Err(QuerySyntaxError::UnbalancedBrackets),
                    Some(_) => Err(QuerySyntaxError::MissingOperator { position: self.pos }),
                }
            }
            Some(Token::Expr(segment)) => {
                self.pos += 1;
                let predicate = parse_predicate(segment)?;
                Ok(self.builder.predicate(predicate))
            }
            None if position > 0 && self.tokens[position - 1] == Token::Open => {
                Err(QuerySyntaxError::UnbalancedBrackets)
            }
            _ => Err(QuerySyntaxError::MissingOperand { position }),
        }
    }
}
