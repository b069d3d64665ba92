#![forbid(unsafe_code)]

//! One displayed level of a searchable menu.
//!
//! A level shows either the children of a tree node or, while its search
//! field holds a query, the ranked search results. Selection never wraps:
//! moving up from the first row hands focus to the search field, moving down
//! from the last row stays put.

use std::sync::Arc;

use stackmenu_core::tree::{LeafNode, Node, NodeKind};

use super::search_field::SearchField;

/// A row of a level.
#[derive(Debug)]
pub enum MenuRow<T> {
    /// A group. `path` locates it in the tree by child indices from the
    /// roots.
    Parent { key: String, path: Vec<usize> },
    Leaf(Arc<LeafNode<T>>),
}

impl<T> Clone for MenuRow<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Parent { key, path } => Self::Parent {
                key: key.clone(),
                path: path.clone(),
            },
            Self::Leaf(leaf) => Self::Leaf(Arc::clone(leaf)),
        }
    }
}

impl<T> MenuRow<T> {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Parent { key, .. } => key,
            Self::Leaf(leaf) => leaf.key(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Parent { .. } => NodeKind::Parent,
            Self::Leaf(_) => NodeKind::Leaf,
        }
    }

    /// Whether the row should show a "more" affordance.
    #[must_use]
    pub fn has_next(&self) -> bool {
        match self {
            Self::Parent { .. } => true,
            Self::Leaf(leaf) => leaf.has_next(),
        }
    }

    #[must_use]
    pub fn leaf(&self) -> Option<&Arc<LeafNode<T>>> {
        match self {
            Self::Parent { .. } => None,
            Self::Leaf(leaf) => Some(leaf),
        }
    }
}

/// Which part of the level receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFocus {
    #[default]
    List,
    Search,
}

/// Rows, selection, and search state of one level.
#[derive(Debug)]
pub struct MenuLevel<T> {
    rows: Vec<MenuRow<T>>,
    results: Option<Vec<MenuRow<T>>>,
    selected: Option<usize>,
    search: SearchField,
    focus: LevelFocus,
    viewport_rows: usize,
}

impl<T> MenuLevel<T> {
    /// Rows for `nodes`, the children found at `base` in the tree.
    #[must_use]
    pub fn from_nodes(nodes: &[Node<T>], base: &[usize], viewport_rows: usize) -> Self {
        let rows = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| match node {
                Node::Parent(parent) => {
                    let mut path = base.to_vec();
                    path.push(index);
                    MenuRow::Parent {
                        key: parent.key().to_owned(),
                        path,
                    }
                }
                Node::Leaf(leaf) => MenuRow::Leaf(Arc::clone(leaf)),
            })
            .collect();
        Self::from_rows(rows, viewport_rows)
    }

    #[must_use]
    pub fn from_rows(rows: Vec<MenuRow<T>>, viewport_rows: usize) -> Self {
        let selected = if rows.is_empty() { None } else { Some(0) };
        Self {
            rows,
            results: None,
            selected,
            search: SearchField::new(),
            focus: LevelFocus::List,
            viewport_rows: viewport_rows.max(1),
        }
    }

    /// Rows currently shown: search results when a query is active,
    /// otherwise the tree rows.
    #[must_use]
    pub fn visible_rows(&self) -> &[MenuRow<T>] {
        self.results.as_deref().unwrap_or(&self.rows)
    }

    /// The unfiltered tree rows.
    #[must_use]
    pub fn tree_rows(&self) -> &[MenuRow<T>] {
        &self.rows
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.results.is_some()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<&MenuRow<T>> {
        self.selected.and_then(|i| self.visible_rows().get(i))
    }

    #[must_use]
    pub fn focus(&self) -> LevelFocus {
        self.focus
    }

    #[must_use]
    pub fn search(&self) -> &SearchField {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchField {
        &mut self.search
    }

    #[must_use]
    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// Rows moved by a page step; the host reports its viewport height here.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
    }

    /// Show `results` instead of the tree rows, or restore the tree rows
    /// with `None`. Selection moves to the first visible row.
    pub fn set_results(&mut self, results: Option<Vec<MenuRow<T>>>) {
        self.results = results;
        self.selected = if self.visible_rows().is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// Give the search field focus, seeding it with `seed`.
    pub fn focus_search(&mut self, seed: Option<char>) {
        self.focus = LevelFocus::Search;
        self.search.focus(seed);
    }

    /// Return focus to the list.
    pub fn focus_list(&mut self) {
        self.focus = LevelFocus::List;
        self.search.blur();
        if self.selected.is_none() && !self.visible_rows().is_empty() {
            self.selected = Some(0);
        }
    }

    /// Move up one row. At the first row focus goes to the search field.
    pub fn select_previous(&mut self) {
        if self.focus == LevelFocus::Search {
            return;
        }
        match self.selected {
            Some(i) if i > 0 => self.selected = Some(i - 1),
            _ => self.focus_search(None),
        }
    }

    /// Move down one row, clamping at the last row. From the search field
    /// focus returns to the list.
    pub fn select_next(&mut self) {
        if self.focus == LevelFocus::Search {
            self.focus_list();
            return;
        }
        let count = self.visible_rows().len();
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        });
    }

    /// Move up by one viewport, clamping at the first row.
    pub fn page_up(&mut self) {
        if self.visible_rows().is_empty() {
            return;
        }
        self.focus_list();
        let current = self.selected.unwrap_or(0);
        self.selected = Some(current.saturating_sub(self.viewport_rows));
    }

    /// Move down by one viewport, clamping at the last row.
    pub fn page_down(&mut self) {
        let count = self.visible_rows().len();
        if count == 0 {
            return;
        }
        self.focus_list();
        let current = self.selected.unwrap_or(0);
        self.selected = Some(current.saturating_add(self.viewport_rows).min(count - 1));
    }

    pub fn select_first(&mut self) {
        if self.visible_rows().is_empty() {
            return;
        }
        self.focus_list();
        self.selected = Some(0);
    }

    pub fn select_last(&mut self) {
        let count = self.visible_rows().len();
        if count == 0 {
            return;
        }
        self.focus_list();
        self.selected = Some(count - 1);
    }
}
