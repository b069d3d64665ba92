#![forbid(unsafe_code)]

//! Fuzzy search over menu leaves.
//!
//! A [`SearchIndex`] flattens every accepted leaf's search terms into
//! `(term, leaf)` records once per tree refresh. Queries rank all records
//! with a [`Ranker`] and keep those at or above the acceptance cutoff.
//!
//! # Example
//!
//! ```
//! use stackmenu_core::search::{SearchIndex, SearchOutcome};
//! use stackmenu_core::tree::{Entry, PathTree};
//!
//! let tree = PathTree::build(vec![Entry::new("Foo/Bar", 1), Entry::new("Qux", 3)]);
//! let index = SearchIndex::from_tree(&tree);
//!
//! let SearchOutcome::Matches(hits) = index.query("bar") else { unreachable!() };
//! assert_eq!(hits[0].entry.leaf().key(), "Bar");
//! assert!(index.query("").is_inactive());
//! ```
//!
//! # Invariants
//!
//! - Scores are integers in `0..=100`.
//! - Results are sorted by descending score; equal scores keep index order.
//! - There is no upper bound on the number of results.
//! - A blank query means "no active filter" and is distinct from an empty
//!   result list.

use std::sync::Arc;

use crate::tree::{IndexedLeaf, LeafNode, PathTree};

/// Default acceptance threshold on the `0..=100` similarity scale.
pub const DEFAULT_CUTOFF: u8 = 75;

/// Similarity scorer consumed as a black box by the index.
pub trait Ranker {
    /// Similarity of `choice` to `query` in `0..=100`.
    fn score(&self, query: &str, choice: &str) -> u8;
}

impl<F> Ranker for F
where
    F: Fn(&str, &str) -> u8,
{
    fn score(&self, query: &str, choice: &str) -> u8 {
        self(query, choice)
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<'a, C> {
    pub candidate: &'a C,
    /// Position of the candidate in the input slice.
    pub index: usize,
    pub score: u8,
}

/// Score every candidate against `query`, best first.
///
/// The sort is stable, so equal scores keep candidate order.
pub fn rank<'a, C>(
    ranker: &dyn Ranker,
    query: &str,
    candidates: &'a [C],
    key_of: impl Fn(&C) -> &str,
) -> Vec<Ranked<'a, C>> {
    let mut ranked: Vec<Ranked<'a, C>> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| Ranked {
            candidate,
            index,
            score: ranker.score(query, key_of(candidate)),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Default scorer: a weighted blend of plain, partial, and token-sorted
/// similarity over case-folded alphanumeric text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedRatio;

impl WeightedRatio {
    /// Lowercase, replace non-alphanumerics with spaces, trim.
    #[must_use]
    pub fn normalize(s: &str) -> String {
        let mapped: String = s
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        mapped.trim().to_owned()
    }

    fn ratio(a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b) * 100.0
    }

    /// Best ratio of the shorter string against every equally long window
    /// of the longer one.
    fn partial_ratio(a: &str, b: &str) -> f64 {
        let (short, long) = if a.chars().count() <= b.chars().count() {
            (a, b)
        } else {
            (b, a)
        };
        let long: Vec<char> = long.chars().collect();
        let width = short.chars().count();
        if width == 0 {
            return 0.0;
        }
        let mut best = 0.0_f64;
        for window in long.windows(width) {
            let window: String = window.iter().collect();
            best = best.max(Self::ratio(short, &window));
            if best >= 100.0 {
                break;
            }
        }
        best
    }

    fn token_sort(s: &str) -> String {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    }

    fn token_sort_ratio(a: &str, b: &str) -> f64 {
        Self::ratio(&Self::token_sort(a), &Self::token_sort(b))
    }
}

impl Ranker for WeightedRatio {
    fn score(&self, query: &str, choice: &str) -> u8 {
        let a = Self::normalize(query);
        let b = Self::normalize(choice);
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let len_a = a.chars().count() as f64;
        let len_b = b.chars().count() as f64;
        let len_ratio = len_a.max(len_b) / len_a.min(len_b);

        let base = Self::ratio(&a, &b);
        let best = if len_ratio < 1.5 {
            base.max(Self::token_sort_ratio(&a, &b) * 0.95)
        } else {
            let scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
            base.max(Self::partial_ratio(&a, &b) * scale)
        };
        best.round().clamp(0.0, 100.0) as u8
    }
}

/// A `(term, leaf)` record.
#[derive(Debug)]
pub struct SearchIndexEntry<T> {
    term: String,
    leaf: Arc<LeafNode<T>>,
}

impl<T> SearchIndexEntry<T> {
    /// The searchable term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The leaf this term finds.
    #[must_use]
    pub fn leaf(&self) -> &Arc<LeafNode<T>> {
        &self.leaf
    }
}

/// A ranked index record.
#[derive(Debug)]
pub struct SearchHit<'a, T> {
    pub entry: &'a SearchIndexEntry<T>,
    pub score: u8,
}

impl<T> Clone for SearchHit<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SearchHit<'_, T> {}

/// Result of a query.
#[derive(Debug)]
pub enum SearchOutcome<'a, T> {
    /// The query was blank: show the unfiltered tree.
    Inactive,
    /// Accepted hits, best first. May be empty.
    Matches(Vec<SearchHit<'a, T>>),
}

impl<'a, T> SearchOutcome<'a, T> {
    /// True for a blank query.
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Inactive)
    }

    /// Hits, or an empty slice when inactive.
    #[must_use]
    pub fn hits(&self) -> &[SearchHit<'a, T>] {
        match self {
            Self::Inactive => &[],
            Self::Matches(hits) => hits,
        }
    }

    /// Distinct leaves in rank order; a leaf matched by several terms
    /// appears once, at its best position.
    #[must_use]
    pub fn distinct_leaves(&self) -> Vec<Arc<LeafNode<T>>> {
        let mut out: Vec<Arc<LeafNode<T>>> = Vec::new();
        for hit in self.hits() {
            if !out.iter().any(|seen| Arc::ptr_eq(seen, &hit.entry.leaf)) {
                out.push(Arc::clone(&hit.entry.leaf));
            }
        }
        out
    }
}

/// Flat term→leaf index, immutable until the next tree refresh.
#[derive(Debug)]
pub struct SearchIndex<T> {
    entries: Vec<SearchIndexEntry<T>>,
    cutoff: u8,
}

impl<T> Default for SearchIndex<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl<T> SearchIndex<T> {
    /// One record per `(leaf, term)` pair, in leaf order then term order.
    #[must_use]
    pub fn build(leaves: &[IndexedLeaf<T>]) -> Self {
        let entries = leaves
            .iter()
            .flat_map(|indexed| {
                indexed.terms.iter().map(|term| SearchIndexEntry {
                    term: term.clone(),
                    leaf: Arc::clone(&indexed.leaf),
                })
            })
            .collect();
        Self {
            entries,
            cutoff: DEFAULT_CUTOFF,
        }
    }

    /// Index every accepted leaf of `tree`.
    #[must_use]
    pub fn from_tree(tree: &PathTree<T>) -> Self {
        Self::build(tree.indexed_leaves())
    }

    /// Set the acceptance cutoff (clamped to `0..=100`).
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: u8) -> Self {
        self.cutoff = cutoff.min(100);
        self
    }

    /// Current acceptance cutoff.
    #[must_use]
    pub fn cutoff(&self) -> u8 {
        self.cutoff
    }

    /// All records.
    #[must_use]
    pub fn entries(&self) -> &[SearchIndexEntry<T>] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Query with the default [`WeightedRatio`] scorer.
    #[must_use]
    pub fn query(&self, query: &str) -> SearchOutcome<'_, T> {
        self.query_with(&WeightedRatio, query)
    }

    /// Query with a caller-supplied scorer.
    #[must_use]
    pub fn query_with(&self, ranker: &dyn Ranker, query: &str) -> SearchOutcome<'_, T> {
        if query.trim().is_empty() {
            return SearchOutcome::Inactive;
        }
        let hits = rank(ranker, query, &self.entries, |entry| entry.term.as_str())
            .into_iter()
            .filter(|ranked| ranked.score >= self.cutoff)
            .map(|ranked| SearchHit {
                entry: ranked.candidate,
                score: ranked.score,
            })
            .collect();
        SearchOutcome::Matches(hits)
    }
}
