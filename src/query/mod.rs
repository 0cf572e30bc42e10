//! Query language.
//!
//! A query selects a subset of a record collection:
//!
//! ```text
//! [cmc <= 2] && [[colors includes {R}] || [t includes artifact]]
//! ```
//!
//! Simple expressions are `<field> [count] <relation> <value>` where the
//! relation is one of `=`, `!=`, `>`, `>=`, `<`, `<=`, `includes`,
//! `excludes`. Expressions combine with `&&` (intersection) and `||`
//! (union); `&&` binds tighter, brackets group.
//!
//! ## Key Types
//!
//! - [`QueryTree`]: Immutable arena tree produced by [`parse`]
//! - [`QueryEvaluator`]: Compiled tree that filters record collections
//! - [`Predicate`]: One field/relation/value test

pub mod ast;
pub mod compare;
pub mod eval;
pub mod parser;
pub mod table;

pub use ast::{
    NodeId, Predicate, QueryNode, QueryTree, QueryTreeBuilder, SetRelation, ValueRelation,
};
pub use eval::{evaluate, QueryEvaluator};
pub use parser::{parse, parse_predicate};
pub use table::{alias_of, field_from_alias};
