//! Arena-based query tree.
//!
//! Nodes live in a flat `Vec<QueryNode>` and reference each other by
//! `NodeId`. Parent links are stored as indices next to the arena, so a
//! tree is a plain value: cloneable, comparable and immutable once built.

use std::fmt;

use smallvec::SmallVec;

use crate::cards::{FilterKey, KeyModifier};

use super::table::{alias_of, modifier_spelling, symbol_of};

/// Index into the `QueryTree` node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Comparison between a field and a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueRelation {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    RegexInclude,
    RegexExclude,
}


/// How a compound node combines its children's match sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetRelation {
    Union,
    Intersect,
}

impl SetRelation {
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            SetRelation::Union => "||",
            SetRelation::Intersect => "&&",
        }
    }
}

/// Leaf test of one field against one literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub key: FilterKey,
    pub modifier: KeyModifier,
    pub relation: ValueRelation,
    pub value: String,
}

impl Predicate {
    /// Create a predicate without a modifier.
    pub fn new(key: FilterKey, relation: ValueRelation, value: impl Into<String>) -> Self {
        Self {
            key,
            modifier: KeyModifier::None,
            relation,
            value: value.into().trim().to_string(),
        }
    }

    /// Set the key modifier (builder pattern).
    #[must_use]
    pub fn with_modifier(mut self, modifier: KeyModifier) -> Self {
        self.modifier = modifier;
        self
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", alias_of(self.key))?;
        if let Some(modifier) = modifier_spelling(self.modifier) {
            write!(f, " {modifier}")?;
        }
        write!(f, " {} {}", symbol_of(self.relation), self.value)
    }
}

/// A node of the query tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryNode {
    /// Leaf predicate.
    Predicate(Predicate),
    /// Interior node with at least one child.
    Compound {
        children: SmallVec<[NodeId; 4]>,
        relation: SetRelation,
    },
}

/// Immutable query tree.
///
/// ## Example
///
/// ```
/// use ccg_deckgen::query::{parse, QueryNode, SetRelation};
///
/// let tree = parse("[cmc = 1] || [power = 2] && [toughness = 3]").unwrap();
/// match tree.node(tree.root()) {
///     QueryNode::Compound { relation, children } => {
///         assert_eq!(*relation, SetRelation::Union);
///         assert_eq!(children.len(), 2);
///     }
///     QueryNode::Predicate(_) => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct QueryTree {
    nodes: Vec<QueryNode>,
    parents: Vec<Option<NodeId>>,
    root: NodeId,
}

impl QueryTree {
    /// A tree holding a single predicate.
    #[must_use]
    pub fn predicate(predicate: Predicate) -> Self {
        let mut builder = QueryTreeBuilder::new();
        let root = builder.predicate(predicate);
        builder.finish(root)
    }

    /// Combine whole trees under one compound node.
    ///
    /// A single tree is returned unchanged; an empty input yields `None`.
    #[must_use]
    pub fn combine(
        relation: SetRelation,
        trees: impl IntoIterator<Item = QueryTree>,
    ) -> Option<Self> {
        let mut trees: Vec<QueryTree> = trees.into_iter().collect();
        match trees.len() {
            0 => None,
            1 => trees.pop(),
            _ => {
                let mut builder = QueryTreeBuilder::new();
                let children = trees
                    .iter()
                    .map(|tree| builder.graft(tree, tree.root))
                    .collect();
                let root = builder.compound(children, relation);
                Some(builder.finish(root))
            }
        }
    }

    /// Combine this tree with another under one compound node.
    #[must_use]
    pub fn join(&self, relation: SetRelation, other: &QueryTree) -> Self {
        let mut builder = QueryTreeBuilder::new();
        let left = builder.graft(self, self.root);
        let right = builder.graft(other, other.root);
        let root = builder.compound(SmallVec::from_slice(&[left, right]), relation);
        builder.finish(root)
    }

    /// The root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &QueryNode {
        &self.nodes[id.index()]
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()]
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Trees always hold at least their root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &QueryNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Iterate over the predicates of the tree.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.nodes.iter().filter_map(|n| match n {
            QueryNode::Predicate(p) => Some(p),
            QueryNode::Compound { .. } => None,
        })
    }

    fn same_shape(&self, a: NodeId, other: &QueryTree, b: NodeId) -> bool {
        match (self.node(a), other.node(b)) {
            (QueryNode::Predicate(p), QueryNode::Predicate(q)) => p == q,
            (
                QueryNode::Compound { children: ca, relation: ra },
                QueryNode::Compound { children: cb, relation: rb },
            ) => {
                ra == rb
                    && ca.len() == cb.len()
                    && ca
                        .iter()
                        .zip(cb.iter())
                        .all(|(x, y)| self.same_shape(*x, other, *y))
            }
            _ => false,
        }
    }

    fn render(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node(id) {
            QueryNode::Predicate(p) => write!(f, "{p}"),
            QueryNode::Compound { children, relation } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", relation.operator())?;
                    }
                    write!(f, "[")?;
                    self.render(*child, f)?;
                    write!(f, "]")?;
                }
                Ok(())
            }
        }
    }
}

/// Structural equality: same shape, same predicates, arena order ignored.
impl PartialEq for QueryTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(self.root, other, other.root)
    }
}

impl Eq for QueryTree {}

/// Canonical query text that parses back to an equal tree.
impl fmt::Display for QueryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(self.root, f)
    }
}

/// Allocates nodes bottom-up, then fixes parent links in `finish`.
#[derive(Debug, Default)]
pub struct QueryTreeBuilder {
    nodes: Vec<QueryNode>,
}

impl QueryTreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: QueryNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate a predicate leaf.
    pub fn predicate(&mut self, predicate: Predicate) -> NodeId {
        self.alloc(QueryNode::Predicate(predicate))
    }

    /// Allocate a compound node. A single child is returned as-is.
    pub fn compound(&mut self, children: SmallVec<[NodeId; 4]>, relation: SetRelation) -> NodeId {
        if children.len() == 1 {
            return children[0];
        }
        self.alloc(QueryNode::Compound { children, relation })
    }

    /// Copy a subtree of another tree into this arena.
    pub fn graft(&mut self, tree: &QueryTree, id: NodeId) -> NodeId {
        match tree.node(id) {
            QueryNode::Predicate(p) => self.predicate(p.clone()),
            QueryNode::Compound { children, relation } => {
                let copied = children.iter().map(|c| self.graft(tree, *c)).collect();
                self.compound(copied, *relation)
            }
        }
    }

    /// Finish the tree rooted at `root`, recording parent links.
    #[must_use]
    pub fn finish(self, root: NodeId) -> QueryTree {
        let mut parents = vec![None; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            if let QueryNode::Compound { children, .. } = node {
                for child in children {
                    parents[child.index()] = Some(NodeId::new(i as u32));
                }
            }
        }
        QueryTree {
            nodes: self.nodes,
            parents,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn cmc(value: &str) -> Predicate {
        Predicate::new(FilterKey::Cmc, ValueRelation::Equal, value)
    }

    #[test]
    fn test_builder_sets_parents() {
        let mut b = QueryTreeBuilder::new();
        let a = b.predicate(cmc("1"));
        let c = b.predicate(cmc("2"));
        let root = b.compound(smallvec![a, c], SetRelation::Union);
        let tree = b.finish(root);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(c), Some(root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_single_child_compound_collapses() {
        let mut b = QueryTreeBuilder::new();
        let a = b.predicate(cmc("1"));
        let root = b.compound(smallvec![a], SetRelation::Intersect);
        assert_eq!(root, a);
        assert!(matches!(b.finish(root).node(a), QueryNode::Predicate(_)));
    }

    #[test]
    fn test_predicate_display() {
        let p = Predicate::new(FilterKey::Colors, ValueRelation::GreaterOrEqual, " 2 ")
            .with_modifier(KeyModifier::Count);
        assert_eq!(p.value, "2");
        assert_eq!(p.to_string(), "colors count >= 2");
    }

    #[test]
    fn test_combine_and_display() {
        let one = QueryTree::predicate(cmc("1"));
        let two = QueryTree::predicate(cmc("2"));
        let both = QueryTree::combine(SetRelation::Intersect, [one.clone(), two]).unwrap();

        assert_eq!(both.to_string(), "[cmc = 1] && [cmc = 2]");
        assert_eq!(one.join(SetRelation::Intersect, &QueryTree::predicate(cmc("2"))), both);
        assert_eq!(QueryTree::combine(SetRelation::Union, [one.clone()]), Some(one));
        assert_eq!(QueryTree::combine(SetRelation::Union, Vec::new()), None);
    }

    #[test]
    fn test_structural_equality_ignores_arena_order() {
        let mut b1 = QueryTreeBuilder::new();
        let x = b1.predicate(cmc("1"));
        let y = b1.predicate(cmc("2"));
        let r1 = b1.compound(smallvec![x, y], SetRelation::Union);
        let t1 = b1.finish(r1);

        let t2 = QueryTree::combine(
            SetRelation::Union,
            [QueryTree::predicate(cmc("1")), QueryTree::predicate(cmc("2"))],
        )
        .unwrap();
        assert_eq!(t1, t2);

        let t3 = QueryTree::combine(
            SetRelation::Intersect,
            [QueryTree::predicate(cmc("1")), QueryTree::predicate(cmc("2"))],
        )
        .unwrap();
        assert_ne!(t1, t3);
    }
}
