#![forbid(unsafe_code)]

//! Path tree construction for hierarchical menus.
//!
//! Turns a flat list of [`Entry`] values with slash-delimited paths into a
//! sorted forest of [`Node`]s.
//!
//! # Example
//!
//! ```
//! use stackmenu_core::tree::{Entry, PathTree};
//!
//! let tree = PathTree::build(vec![
//!     Entry::new("Foo/Bar", 1),
//!     Entry::new("Foo/Baz", 2),
//!     Entry::new("Qux", 3),
//! ]);
//!
//! assert_eq!(tree.roots()[0].key(), "Foo");
//! assert_eq!(tree.roots()[1].key(), "Qux");
//! assert!(tree.find(&["Foo", "Baz"]).is_some());
//! ```
//!
//! # Invariants
//!
//! 1. Every accepted entry's leaf is reachable by following exactly the
//!    segments of its path.
//! 2. No two siblings share both kind and key. Interior segments reuse the
//!    first matching parent; a second leaf at an occupied leaf position is
//!    rejected.
//! 3. In every sibling list parents precede leaves, and same-kind nodes are
//!    ordered by [`collate`].
//! 4. New parents are inserted at the front of their level during
//!    construction; the final sort is stable, so ties keep encounter order.
//!
//! # Failure Modes
//!
//! - Malformed paths are skipped, logged with `tracing::warn!`, and recorded
//!   in [`TreeReport::rejections`]. Building never fails.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::logging::TREE_TARGET;
use crate::path::{MenuPath, PathError};

/// Caller-supplied leaf description.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    /// `/`-delimited path; `\/` is a literal slash inside a segment.
    pub path: String,
    /// Value surfaced when the leaf is selected.
    pub value: T,
    /// Terms the leaf is findable by (aliases, namespace fragments).
    pub search_terms: Vec<String>,
    /// Whether selecting the leaf leads to a further step.
    pub has_next: bool,
}

impl<T> Entry<T> {
    /// Create an entry with no search terms and `has_next = false`.
    #[must_use]
    pub fn new(path: impl Into<String>, value: T) -> Self {
        Self {
            path: path.into(),
            value,
            search_terms: Vec::new(),
            has_next: false,
        }
    }

    /// Add a search term.
    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.search_terms.push(term.into());
        self
    }

    /// Replace all search terms.
    #[must_use]
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the leaf as leading somewhere further.
    #[must_use]
    pub fn with_has_next(mut self, has_next: bool) -> Self {
        self.has_next = has_next;
        self
    }
}

/// Discriminator for the two node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Parent,
    Leaf,
}

/// A selectable end point of the tree.
#[derive(Debug, PartialEq)]
pub struct LeafNode<T> {
    key: String,
    value: T,
    has_next: bool,
}

impl<T> LeafNode<T> {
    /// Display key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The caller's value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Whether selecting this leaf leads to a further step.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.has_next
    }
}

/// An interior node grouping children under one key.
#[derive(Debug, PartialEq)]
pub struct ParentNode<T> {
    key: String,
    children: Vec<Node<T>>,
}

impl<T> ParentNode<T> {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            children: Vec::new(),
        }
    }

    /// Display key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sorted children.
    #[must_use]
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }
}

impl<T> Clone for ParentNode<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            children: self.children.clone(),
        }
    }
}

/// A tree element.
///
/// Leaves are shared (`Arc`) between the tree and the search index so a
/// search hit is the same leaf the tree displays.
#[derive(Debug, PartialEq)]
pub enum Node<T> {
    Parent(ParentNode<T>),
    Leaf(Arc<LeafNode<T>>),
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Parent(parent) => Self::Parent(parent.clone()),
            Self::Leaf(leaf) => Self::Leaf(Arc::clone(leaf)),
        }
    }
}

impl<T> Node<T> {
    /// Display key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Parent(parent) => &parent.key,
            Self::Leaf(leaf) => &leaf.key,
        }
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Parent(_) => NodeKind::Parent,
            Self::Leaf(_) => NodeKind::Leaf,
        }
    }

    /// Children of a parent, or an empty slice for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Node<T>] {
        match self {
            Self::Parent(parent) => &parent.children,
            Self::Leaf(_) => &[],
        }
    }

    /// Whether the row should show a "more" affordance.
    #[must_use]
    pub fn has_next(&self) -> bool {
        match self {
            Self::Parent(_) => true,
            Self::Leaf(leaf) => leaf.has_next,
        }
    }

    fn is_parent_named(&self, key: &str) -> bool {
        matches!(self, Self::Parent(parent) if parent.key == key)
    }

    fn is_leaf_named(&self, key: &str) -> bool {
        matches!(self, Self::Leaf(leaf) if leaf.key == key)
    }
}

/// Case-aware key ordering.
///
/// Keys compare case-insensitively first; keys that differ only in case put
/// lowercase before uppercase at the first differing position, and any
/// remaining tie falls back to code point order.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a
        .cmp(folded_b)
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Sibling order: parents first, then same-kind nodes by [`collate`].
#[must_use]
pub fn compare_nodes<T>(a: &Node<T>, b: &Node<T>) -> Ordering {
    match (a, b) {
        (Node::Parent(_), Node::Leaf(_)) => Ordering::Less,
        (Node::Leaf(_), Node::Parent(_)) => Ordering::Greater,
        _ => collate(a.key(), b.key()),
    }
}

/// Why an entry was left out of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The path did not match the segment grammar.
    InvalidPath(PathError),
    /// An earlier entry already placed a leaf at this path.
    DuplicateLeaf,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath(err) => write!(f, "invalid path: {err}"),
            Self::DuplicateLeaf => write!(f, "a leaf already exists at this path"),
        }
    }
}

/// A skipped entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Position of the entry in the input sequence.
    pub entry_index: usize,
    /// The offending path, verbatim.
    pub path: String,
    pub reason: RejectionReason,
}

/// Diagnostics side channel of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeReport {
    pub accepted: usize,
    pub rejections: Vec<Rejection>,
}

impl TreeReport {
    /// True when every entry made it into the tree.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// An accepted entry's leaf together with the terms it is searchable by.
#[derive(Debug)]
pub struct IndexedLeaf<T> {
    pub terms: Vec<String>,
    pub leaf: Arc<LeafNode<T>>,
}

/// The sorted forest produced from one set of entries.
#[derive(Debug)]
pub struct PathTree<T> {
    roots: Vec<Node<T>>,
    leaves: Vec<IndexedLeaf<T>>,
    report: TreeReport,
}

impl<T> PathTree<T> {
    /// Build a sorted forest from `entries`.
    ///
    /// Entries without search terms are indexed under their leaf name.
    pub fn build(entries: impl IntoIterator<Item = Entry<T>>) -> Self {
        let mut roots = Vec::new();
        let mut leaves = Vec::new();
        let mut report = TreeReport::default();

        for (entry_index, entry) in entries.into_iter().enumerate() {
            let path = match MenuPath::parse(&entry.path) {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(
                        target: TREE_TARGET,
                        entry_index,
                        path = %entry.path,
                        error = %err,
                        "invalid menu path; entry skipped"
                    );
                    report.rejections.push(Rejection {
                        entry_index,
                        path: entry.path,
                        reason: RejectionReason::InvalidPath(err),
                    });
                    continue;
                }
            };

            let leaf = Arc::new(LeafNode {
                key: path.leaf().to_owned(),
                value: entry.value,
                has_next: entry.has_next,
            });

            if !insert_leaf(&mut roots, path.parents(), Arc::clone(&leaf)) {
                tracing::warn!(
                    target: TREE_TARGET,
                    entry_index,
                    path = %entry.path,
                    "duplicate menu path; entry skipped"
                );
                report.rejections.push(Rejection {
                    entry_index,
                    path: entry.path,
                    reason: RejectionReason::DuplicateLeaf,
                });
                continue;
            }

            let terms = if entry.search_terms.is_empty() {
                vec![path.leaf().to_owned()]
            } else {
                entry.search_terms
            };
            leaves.push(IndexedLeaf { terms, leaf });
            report.accepted += 1;
        }

        sort_level(&mut roots);
        tracing::debug!(
            target: TREE_TARGET,
            accepted = report.accepted,
            rejected = report.rejections.len(),
            roots = roots.len(),
            "menu tree built"
        );

        Self {
            roots,
            leaves,
            report,
        }
    }

    /// Top-level nodes.
    #[must_use]
    pub fn roots(&self) -> &[Node<T>] {
        &self.roots
    }

    /// Accepted leaves in entry order, with their search terms.
    #[must_use]
    pub fn indexed_leaves(&self) -> &[IndexedLeaf<T>] {
        &self.leaves
    }

    /// Build diagnostics.
    #[must_use]
    pub fn report(&self) -> &TreeReport {
        &self.report
    }

    /// Follow `segments` from the roots: parents for every segment but the
    /// last, which must name a leaf.
    #[must_use]
    pub fn find(&self, segments: &[&str]) -> Option<&Node<T>> {
        let (leaf, parents) = segments.split_last()?;
        let mut level = self.roots.as_slice();
        for key in parents {
            level = level.iter().find(|n| n.is_parent_named(key))?.children();
        }
        level.iter().find(|n| n.is_leaf_named(leaf))
    }

    /// Follow child indices from the roots.
    #[must_use]
    pub fn node_at(&self, indices: &[usize]) -> Option<&Node<T>> {
        let (first, rest) = indices.split_first()?;
        let mut node = self.roots.get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node)
    }

    /// Take ownership of the roots.
    #[must_use]
    pub fn into_roots(self) -> Vec<Node<T>> {
        self.roots
    }
}

/// Walk (or extend) `level` along `parents` and append `leaf`.
///
/// Missing parents are inserted at the front of their level. Returns `false`
/// when a leaf with the same key already occupies the target level.
fn insert_leaf<T>(level: &mut Vec<Node<T>>, parents: &[String], leaf: Arc<LeafNode<T>>) -> bool {
    let Some((key, rest)) = parents.split_first() else {
        if level.iter().any(|n| n.is_leaf_named(&leaf.key)) {
            return false;
        }
        level.push(Node::Leaf(leaf));
        return true;
    };

    let index = match level.iter().position(|n| n.is_parent_named(key)) {
        Some(index) => index,
        None => {
            level.insert(0, Node::Parent(ParentNode::new(key)));
            0
        }
    };

    match &mut level[index] {
        Node::Parent(parent) => insert_leaf(&mut parent.children, rest, leaf),
        Node::Leaf(_) => false,
    }
}

fn sort_level<T>(level: &mut [Node<T>]) {
    level.sort_by(compare_nodes);
    for node in level.iter_mut() {
        if let Node::Parent(parent) = node {
            sort_level(&mut parent.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<T>(level: &[Node<T>]) -> Vec<&str> {
        level.iter().map(Node::key).collect()
    }

    #[test]
    fn scenario_foo_bar_baz_qux() {
        let tree = PathTree::build(vec![
            Entry::new("Foo/Bar", 1),
            Entry::new("Foo/Baz", 2),
            Entry::new("Qux", 3),
        ]);

        assert_eq!(keys(tree.roots()), vec!["Foo", "Qux"]);
        assert_eq!(tree.roots()[0].kind(), NodeKind::Parent);
        assert_eq!(tree.roots()[1].kind(), NodeKind::Leaf);
        assert_eq!(keys(tree.roots()[0].children()), vec!["Bar", "Baz"]);
        assert!(tree.report().is_clean());
        assert_eq!(tree.report().accepted, 3);
    }

    #[test]
    fn leaf_sorts_after_parent_even_when_key_is_smaller() {
        let tree = PathTree::build(vec![Entry::new("A", 0), Entry::new("Z/x", 1)]);
        assert_eq!(keys(tree.roots()), vec!["Z", "A"]);
    }

    #[test]
    fn parent_and_leaf_may_share_a_key() {
        let tree = PathTree::build(vec![Entry::new("Mesh", 0), Entry::new("Mesh/Cube", 1)]);
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.roots()[0].kind(), NodeKind::Parent);
        assert_eq!(tree.roots()[1].kind(), NodeKind::Leaf);
    }

    #[test]
    fn parents_are_reused() {
        let tree = PathTree::build(vec![
            Entry::new("A/B/one", 1),
            Entry::new("A/B/two", 2),
            Entry::new("A/three", 3),
        ]);
        assert_eq!(tree.roots().len(), 1);
        let a = &tree.roots()[0];
        assert_eq!(keys(a.children()), vec!["B", "three"]);
        assert_eq!(keys(a.children()[0].children()), vec!["one", "two"]);
    }

    #[test]
    fn invalid_paths_are_reported_not_fatal() {
        let tree = PathTree::build(vec![
            Entry::new("", 0),
            Entry::new("Ok", 1),
            Entry::new("Broken/", 2),
        ]);
        assert_eq!(keys(tree.roots()), vec!["Ok"]);
        let reasons: Vec<_> = tree
            .report()
            .rejections
            .iter()
            .map(|r| (r.entry_index, r.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (0, RejectionReason::InvalidPath(PathError::Empty)),
                (2, RejectionReason::InvalidPath(PathError::TrailingSeparator)),
            ]
        );
    }

    #[test]
    fn duplicate_leaf_keeps_first() {
        let tree = PathTree::build(vec![Entry::new("X/y", 1), Entry::new("X/y", 2)]);
        let Some(Node::Leaf(leaf)) = tree.find(&["X", "y"]) else {
            panic!("leaf missing");
        };
        assert_eq!(*leaf.value(), 1);
        assert_eq!(tree.report().rejections[0].reason, RejectionReason::DuplicateLeaf);
        assert_eq!(tree.indexed_leaves().len(), 1);
    }

    #[test]
    fn collate_is_case_aware() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Banana", "apple"), Ordering::Greater);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("abc", "abc"), Ordering::Equal);
    }

    #[test]
    fn escaped_slash_becomes_one_segment() {
        let tree = PathTree::build(vec![Entry::new("Units/km\\/h", 1)]);
        assert!(tree.find(&["Units", "km/h"]).is_some());
    }

    #[test]
    fn missing_terms_fall_back_to_leaf_name() {
        let tree = PathTree::build(vec![
            Entry::new("Foo/Bar", 1),
            Entry::new("Qux", 2).term("quux").term("q"),
        ]);
        assert_eq!(tree.indexed_leaves()[0].terms, vec!["Bar"]);
        assert_eq!(tree.indexed_leaves()[1].terms, vec!["quux", "q"]);
    }

    #[test]
    fn node_at_follows_indices() {
        let tree = PathTree::build(vec![Entry::new("A/B/c", 1), Entry::new("d", 2)]);
        assert_eq!(tree.node_at(&[0, 0, 0]).map(Node::key), Some("c"));
        assert_eq!(tree.node_at(&[1]).map(Node::key), Some("d"));
        assert!(tree.node_at(&[]).is_none());
        assert!(tree.node_at(&[1, 0]).is_none());
    }

    #[test]
    fn has_next_carried_to_leaf() {
        let tree = PathTree::build(vec![Entry::new("Generic", ()).with_has_next(true)]);
        assert!(tree.roots()[0].has_next());
    }
}
