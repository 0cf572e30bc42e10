//! Query evaluation.
//!
//! `QueryEvaluator` compiles a tree once (regex patterns and numeric
//! literals per predicate) and then evaluates it against any number of
//! record collections. Each node produces a membership mask over the input
//! slice; compound nodes combine their children's masks with OR (union) or
//! AND (intersection). Reading the final mask in input order keeps the
//! result order-preserving and duplicate-free.

use regex::Regex;

use crate::cards::{parse_number, CardRecord, FieldValue, KeyModifier};
use crate::core::EvalOptions;

use super::ast::{NodeId, Predicate, QueryNode, QueryTree, SetRelation, ValueRelation};
use super::compare::{compile_pattern, loosely_equal, NumericRelation};

/// A predicate with its literal pre-processed.
#[derive(Debug)]
struct CompiledPredicate<'q> {
    predicate: &'q Predicate,
    literal_number: Option<f64>,
    pattern: Option<Regex>,
}

impl<'q> CompiledPredicate<'q> {
    fn new(predicate: &'q Predicate) -> Self {
        let pattern = match predicate.relation {
            ValueRelation::RegexInclude | ValueRelation::RegexExclude => {
                compile_pattern(&predicate.value)
            }
            _ => None,
        };
        Self {
            predicate,
            literal_number: parse_number(&predicate.value),
            pattern,
        }
    }

    fn test(&self, value: &FieldValue<'_>, options: EvalOptions) -> bool {
        match value {
            FieldValue::List(items) if self.predicate.modifier == KeyModifier::Count => {
                self.test_scalar(&FieldValue::Number(items.len() as f64), options)
            }
            FieldValue::List(items) => match self.predicate.relation {
                ValueRelation::Equal | ValueRelation::RegexInclude => items
                    .iter()
                    .any(|item| self.test_text(item, options)),
                ValueRelation::NotEqual | ValueRelation::RegexExclude => items
                    .iter()
                    .all(|item| self.test_text(item, options)),
                _ => false,
            },
            _ => self.test_scalar(value, options),
        }
    }

    fn test_scalar(&self, value: &FieldValue<'_>, options: EvalOptions) -> bool {
        if let Some(order) = numeric_relation(self.predicate.relation) {
            return match (value.as_number(), self.literal_number) {
                (Some(field), Some(literal)) => order.holds(field, literal),
                _ => false,
            };
        }
        match value.as_string() {
            Some(text) => self.test_text(&text, options),
            None => self.predicate.relation == ValueRelation::NotEqual,
        }
    }

    fn test_text(&self, text: &str, options: EvalOptions) -> bool {
        let literal = &self.predicate.value;
        match self.predicate.relation {
            ValueRelation::Equal => loosely_equal(text, literal, options.strict_case),
            ValueRelation::NotEqual => !loosely_equal(text, literal, options.strict_case),
            ValueRelation::RegexInclude => self.pattern.as_ref().is_some_and(|p| p.is_match(text)),
            ValueRelation::RegexExclude => self.pattern.as_ref().is_some_and(|p| !p.is_match(text)),
            ValueRelation::GreaterThan
            | ValueRelation::GreaterOrEqual
            | ValueRelation::LessThan
            | ValueRelation::LessOrEqual => match (parse_number(text), self.literal_number) {
                (Some(field), Some(literal)) => numeric_relation(self.predicate.relation)
                    .is_some_and(|order| order.holds(field, literal)),
                _ => false,
            },
        }
    }
}

fn numeric_relation(relation: ValueRelation) -> Option<NumericRelation> {
    match relation {
        ValueRelation::GreaterThan => Some(NumericRelation::Greater),
        ValueRelation::GreaterOrEqual => Some(NumericRelation::GreaterOrEqual),
        ValueRelation::LessThan => Some(NumericRelation::Less),
        ValueRelation::LessOrEqual => Some(NumericRelation::LessOrEqual),
        _ => None,
    }
}

/// Evaluates one query tree against record collections.
#[derive(Debug)]
pub struct QueryEvaluator<'q> {
    tree: &'q QueryTree,
    /// Indexed by node; `None` for compound nodes.
    compiled: Vec<Option<CompiledPredicate<'q>>>,
    options: EvalOptions,
}

impl<'q> QueryEvaluator<'q> {
    /// Compile a tree for evaluation.
    #[must_use]
    pub fn new(tree: &'q QueryTree, options: EvalOptions) -> Self {
        let compiled = tree
            .iter()
            .map(|(_, node)| match node {
                QueryNode::Predicate(p) => Some(CompiledPredicate::new(p)),
                QueryNode::Compound { .. } => None,
            })
            .collect();
        Self {
            tree,
            compiled,
            options,
        }
    }

    /// The tree being evaluated.
    #[must_use]
    pub fn tree(&self) -> &'q QueryTree {
        self.tree
    }

    /// Whether a single record matches.
    pub fn matches<R: CardRecord + ?Sized>(&self, record: &R) -> bool {
        self.matches_node(self.tree.root(), record)
    }

    fn matches_node<R: CardRecord + ?Sized>(&self, id: NodeId, record: &R) -> bool {
        match self.tree.node(id) {
            QueryNode::Predicate(p) => self.compiled[id.index()]
                .as_ref()
                .is_some_and(|c| c.test(&record.field(p.key), self.options)),
            QueryNode::Compound { children, relation } => match relation {
                SetRelation::Union => children.iter().any(|c| self.matches_node(*c, record)),
                SetRelation::Intersect => children.iter().all(|c| self.matches_node(*c, record)),
            },
        }
    }

    /// Membership mask over `records`, one entry per record.
    pub fn evaluate_mask<R: CardRecord + ?Sized>(&self, records: &[&R]) -> Vec<bool> {
        self.node_mask(self.tree.root(), records)
    }

    fn node_mask<R: CardRecord + ?Sized>(&self, id: NodeId, records: &[&R]) -> Vec<bool> {
        match self.tree.node(id) {
            QueryNode::Predicate(p) => match &self.compiled[id.index()] {
                Some(compiled) => records
                    .iter()
                    .map(|r| compiled.test(&r.field(p.key), self.options))
                    .collect(),
                None => vec![false; records.len()],
            },
            QueryNode::Compound { children, relation } => {
                let mut children = children.iter();
                let mut mask = match children.next() {
                    Some(first) => self.node_mask(*first, records),
                    None => return vec![false; records.len()],
                };
                for child in children {
                    let other = self.node_mask(*child, records);
                    for (m, o) in mask.iter_mut().zip(other) {
                        *m = match relation {
                            SetRelation::Union => *m || o,
                            SetRelation::Intersect => *m && o,
                        };
                    }
                }
                mask
            }
        }
    }

    /// Matching records of a borrowed collection, in input order.
    pub fn filter<'r, R: CardRecord + ?Sized>(&self, records: &[&'r R]) -> Vec<&'r R> {
        let mask = self.evaluate_mask(records);
        records
            .iter()
            .zip(mask)
            .filter_map(|(r, keep)| keep.then_some(*r))
            .collect()
    }

    /// Matching records of an owned collection, in input order.
    pub fn evaluate<'r, R: CardRecord>(&self, records: &'r [R]) -> Vec<&'r R> {
        let refs: Vec<&R> = records.iter().collect();
        self.filter(&refs)
    }
}

/// Evaluate a tree against a collection.
///
/// Compiles the tree on every call; hold a `QueryEvaluator` to evaluate
/// the same tree repeatedly.
pub fn evaluate<'r, R: CardRecord>(
    tree: &QueryTree,
    records: &'r [R],
    options: EvalOptions,
) -> Vec<&'r R> {
    QueryEvaluator::new(tree, options).evaluate(records)
}
