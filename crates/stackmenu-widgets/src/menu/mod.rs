#![forbid(unsafe_code)]

//! Searchable hierarchical picker.
//!
//! [`SearchableMenu`] turns a flat list of [`Entry`] values into a
//! [`PathTree`] and a [`SearchIndex`], shows the tree one level per frame on
//! a [`NavigationStack`], and reacts to navigation commands addressed to its
//! stack.
//!
//! | Command         | Stack non-empty                          | Stack empty            |
//! |-----------------|------------------------------------------|------------------------|
//! | `Back`          | pop the top level                        | [`Selection::Cancelled`] |
//! | `Submit` leaf   | [`Selection::Made`] with the leaf value  | n/a                    |
//! | `Submit` parent | push a level with the parent's children  | n/a                    |
//! | `Search(c)`     | focus the search field, seeded with `c`  | held for the next root |
//! | `Up` / `Down`   | move one row, no wrap                    | ignored                |
//! | `PageUp/Down`   | move one viewport                        | ignored                |
//! | `Top/Bottom`    | first / last row                         | ignored                |
//!
//! While the top level is still entering, or a queued operation is about to
//! replace it, every command except `Back` is swallowed (`Stop`) without
//! effect. `Back` always queues a pop.
//!
//! # Example
//!
//! ```
//! use stackmenu_core::tree::Entry;
//! use stackmenu_widgets::keys::NavigationKey;
//! use stackmenu_widgets::menu::{SearchableMenu, Selection};
//!
//! let mut menu = SearchableMenu::new("picker");
//! menu.refresh(vec![Entry::new("Foo/Bar", 1), Entry::new("Foo/Baz", 2), Entry::new("Qux", 3)]);
//!
//! menu.handle_key(NavigationKey::Char('q'));
//! menu.handle_key(NavigationKey::Next);
//! menu.handle_key(NavigationKey::Submit);
//! assert_eq!(menu.drain_selections(), vec![Selection::Made(3)]);
//! ```
//!
//! # Failure Modes
//!
//! - A panicking selection callback is caught, logged with
//!   `tracing::error!`, and counted in
//!   [`callback_panics`](SearchableMenu::callback_panics). The menu's state
//!   is unaffected and the selection is still queued.

pub mod level;
pub mod search_field;

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::sync::Arc;

use stackmenu_core::command::{Command, CommandKind, CommandTable, CommandTag, Propagation, StackId};
use stackmenu_core::error::FrameId;
use stackmenu_core::logging::MENU_TARGET;
use stackmenu_core::search::{Ranker, SearchIndex, SearchOutcome, WeightedRatio};
use stackmenu_core::tree::{Entry, Node, PathTree, TreeReport};
use web_time::Duration;

use crate::config::MenuConfig;
use crate::frame::{FrameHeader, FrameSpec};
use crate::keys::NavigationKey;
use crate::router::CommandReceiver;
use crate::stack::{NavigationStack, OperationOutcome};

pub use level::{LevelFocus, MenuLevel, MenuRow};
pub use search_field::SearchField;

/// Frame description carried by menu push commands.
pub type LevelSpec<T> = FrameSpec<MenuLevel<T>>;

/// Picker outcome reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// A leaf was submitted.
    Made(T),
    /// Back was pressed with nothing left to pop.
    Cancelled,
}

type SelectionCallback<T> = Box<dyn FnMut(&Selection<T>)>;

/// A tree picker with per-level fuzzy search.
pub struct SearchableMenu<T> {
    stack: NavigationStack<MenuLevel<T>>,
    tree: PathTree<T>,
    index: SearchIndex<T>,
    ranker: Box<dyn Ranker>,
    config: MenuConfig,
    header_text: String,
    root_frame: Option<FrameId>,
    pending_search: SearchField,
    on_selection: Option<SelectionCallback<T>>,
    selections: VecDeque<Selection<T>>,
    callback_panics: usize,
    commands: Rc<CommandTable<Self, LevelSpec<T>>>,
}

impl<T: 'static> std::fmt::Debug for SearchableMenu<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchableMenu")
            .field("stack", &self.stack)
            .field("header_text", &self.header_text)
            .field("index_len", &self.index.len())
            .field("pending_selections", &self.selections.len())
            .finish()
    }
}

impl<T: Clone + 'static> SearchableMenu<T> {
    #[must_use]
    pub fn new(stack_id: impl Into<StackId>) -> Self {
        Self::with_config(stack_id, MenuConfig::default())
    }

    #[must_use]
    pub fn with_config(stack_id: impl Into<StackId>, config: MenuConfig) -> Self {
        let mut stack = NavigationStack::with_config(stack_id, config.to_transition_config());
        stack.set_reduced_motion(config.transition.reduced_motion);
        Self {
            stack,
            tree: PathTree::build(Vec::new()),
            index: SearchIndex::default().with_cutoff(config.search.cutoff),
            ranker: Box::new(WeightedRatio),
            config,
            header_text: String::new(),
            root_frame: None,
            pending_search: SearchField::new(),
            on_selection: None,
            selections: VecDeque::new(),
            callback_panics: 0,
            commands: Rc::new(Self::command_table()),
        }
    }

    /// Replace the similarity scorer.
    #[must_use]
    pub fn with_ranker(mut self, ranker: impl Ranker + 'static) -> Self {
        self.ranker = Box::new(ranker);
        self
    }

    /// Register the selection callback, replacing any previous one.
    pub fn on_selection(&mut self, callback: impl FnMut(&Selection<T>) + 'static) {
        self.on_selection = Some(Box::new(callback));
    }

    fn command_table() -> CommandTable<Self, LevelSpec<T>> {
        CommandTable::<Self, LevelSpec<T>>::new()
            .with(CommandTag::Back, |menu, _cmd| {
                menu.back();
                Propagation::Stop
            })
            .with(CommandTag::Submit, |menu, _cmd| menu.submit())
            .with(CommandTag::Search, |menu, cmd| match cmd.kind() {
                CommandKind::Search(c) => menu.type_char(c),
                _ => Propagation::Continue,
            })
            .with(CommandTag::Up, |menu, _cmd| {
                menu.with_level(MenuLevel::select_previous, false)
            })
            .with(CommandTag::Down, |menu, _cmd| {
                menu.with_level(MenuLevel::select_next, false)
            })
            .with(CommandTag::PageUp, |menu, _cmd| {
                menu.with_level(MenuLevel::page_up, false)
            })
            .with(CommandTag::PageDown, |menu, _cmd| {
                menu.with_level(MenuLevel::page_down, false)
            })
            .with(CommandTag::Top, |menu, _cmd| {
                menu.with_level(MenuLevel::select_first, false)
            })
            .with(CommandTag::Bottom, |menu, _cmd| {
                menu.with_level(MenuLevel::select_last, false)
            })
            .with(CommandTag::PushFrame, |menu, cmd| menu.stack.handle_command(cmd))
            .with(CommandTag::PopFrame, |menu, cmd| menu.stack.handle_command(cmd))
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Rebuild tree and index from `entries` and show the root level.
    ///
    /// Any in-flight navigation is cancelled. Characters typed while the
    /// stack was empty become the root level's query.
    pub fn refresh(&mut self, entries: impl IntoIterator<Item = Entry<T>>) -> &TreeReport {
        self.tree = PathTree::build(entries);
        self.index = SearchIndex::from_tree(&self.tree).with_cutoff(self.config.search.cutoff);
        self.stack.clear();

        let level = MenuLevel::from_nodes(
            self.tree.roots(),
            &[],
            self.config.navigation.viewport_rows,
        );
        let spec = FrameSpec::new(level).with_header(FrameHeader::new(self.header_text.clone()));
        let handle = self.stack.push_immediate(spec);
        self.root_frame = handle.outcome().and_then(OperationOutcome::completed);

        let pending = std::mem::take(&mut self.pending_search);
        if !pending.text().is_empty() {
            self.with_level(
                |level| {
                    level.focus_search(None);
                    level.search_mut().set_text(pending.text());
                },
                true,
            );
        }
        self.tree.report()
    }

    #[must_use]
    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    /// Set the root level's title, updating it live if shown.
    pub fn set_header_text(&mut self, text: impl Into<String>) {
        self.header_text = text.into();
        if let Some(root) = self.root_frame
            && self.stack.set_header_text(root, self.header_text.clone()).is_err()
        {
            self.root_frame = None;
        }
    }

    #[must_use]
    pub fn tree(&self) -> &PathTree<T> {
        &self.tree
    }

    #[must_use]
    pub fn index(&self) -> &SearchIndex<T> {
        &self.index
    }

    #[must_use]
    pub fn report(&self) -> &TreeReport {
        self.tree.report()
    }

    #[must_use]
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    #[must_use]
    pub fn stack(&self) -> &NavigationStack<MenuLevel<T>> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut NavigationStack<MenuLevel<T>> {
        &mut self.stack
    }

    /// The level on top of the stack.
    #[must_use]
    pub fn active_level(&self) -> Option<&MenuLevel<T>> {
        self.stack.try_peek().map(|frame| frame.content())
    }

    /// Drive transitions. Returns `true` while animating.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.stack.tick(delta)
    }

    /// Host teardown: cancel navigation and drop every level.
    pub fn detach(&mut self) {
        self.stack.detach();
        self.root_frame = None;
        self.pending_search.reset();
    }

    /// Query typed while the stack was empty, waiting for the next
    /// [`refresh`](Self::refresh).
    #[must_use]
    pub fn pending_search(&self) -> &str {
        self.pending_search.text()
    }

    // ------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------

    /// Take every selection reported since the last drain.
    pub fn drain_selections(&mut self) -> Vec<Selection<T>> {
        self.selections.drain(..).collect()
    }

    /// Number of selection callbacks that panicked.
    #[must_use]
    pub fn callback_panics(&self) -> usize {
        self.callback_panics
    }

    fn emit(&mut self, selection: Selection<T>) {
        let panicked = match self.on_selection.as_mut() {
            Some(callback) => catch_unwind(AssertUnwindSafe(|| callback(&selection))).is_err(),
            None => false,
        };
        if panicked {
            self.callback_panics += 1;
            tracing::error!(
                target: MENU_TARGET,
                stack_id = %self.stack.id(),
                "selection callback panicked; caught by error boundary"
            );
        }
        self.selections.push_back(selection);
    }

    // ------------------------------------------------------------------
    // Search editing
    // ------------------------------------------------------------------

    /// Append a character to the active level's query.
    ///
    /// With nothing on the stack the character is held and seeds the root
    /// level shown by the next refresh.
    pub fn type_char(&mut self, c: char) -> Propagation {
        if self.stack.is_empty() {
            self.pending_search.focus(Some(c));
            return Propagation::Stop;
        }
        self.with_level(|level| level.focus_search(Some(c)), true)
    }

    /// Delete the last grapheme of the active level's query.
    pub fn backspace(&mut self) -> Propagation {
        if self.stack.is_empty() && self.pending_search.backspace() {
            return Propagation::Stop;
        }
        self.with_level(
            |level| {
                level.search_mut().backspace();
            },
            true,
        )
    }

    /// Clear the active level's query and show its tree rows again.
    pub fn reset_search(&mut self) -> Propagation {
        self.with_level(
            |level| {
                level.search_mut().reset();
                level.focus_list();
            },
            true,
        )
    }

    /// Ranked rows for `query`, or `None` for a blank query.
    fn search_rows(&self, query: &str) -> Option<Vec<MenuRow<T>>> {
        let outcome = self.index.query_with(self.ranker.as_ref(), query);
        let hits = match &outcome {
            SearchOutcome::Inactive => return None,
            SearchOutcome::Matches(hits) => hits,
        };
        let rows = if self.config.search.collapse_aliases {
            outcome
                .distinct_leaves()
                .into_iter()
                .map(MenuRow::Leaf)
                .collect()
        } else {
            hits.iter()
                .map(|hit| MenuRow::Leaf(Arc::clone(hit.entry.leaf())))
                .collect()
        };
        Some(rows)
    }

    /// The top level, if it is enabled and no queued operation will replace
    /// it.
    fn interactive_level(&mut self) -> Option<&mut MenuLevel<T>> {
        if self.stack.queued() > 0 {
            return None;
        }
        self.stack
            .try_peek_mut()
            .filter(|frame| frame.is_enabled())
            .map(|frame| frame.content_mut())
    }

    /// Run `edit` on the active level; re-run its search when `requery`.
    /// Propagated when the stack is empty, swallowed while the top level is
    /// not interactive.
    fn with_level(&mut self, edit: impl FnOnce(&mut MenuLevel<T>), requery: bool) -> Propagation {
        if self.stack.try_peek().is_none() {
            return Propagation::Continue;
        }
        let Some(level) = self.interactive_level() else {
            return Propagation::Stop;
        };
        let before = level.search().text().to_owned();
        edit(level);
        let query = level.search().text().to_owned();

        if requery && query != before {
            let results = self.search_rows(&query);
            if let Some(frame) = self.stack.try_peek_mut() {
                frame.content_mut().set_results(results);
            }
        }
        Propagation::Stop
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    fn back(&mut self) {
        if self.stack.projected_depth() == 0 {
            self.emit(Selection::Cancelled);
        } else {
            let _ = self.stack.try_pop();
        }
    }

    fn submit(&mut self) -> Propagation {
        if self.stack.try_peek().is_none() {
            return Propagation::Continue;
        }
        let Some(level) = self.interactive_level() else {
            return Propagation::Stop;
        };
        let Some(row) = level.selected_row().cloned() else {
            return Propagation::Continue;
        };
        match row {
            MenuRow::Leaf(leaf) => self.emit(Selection::Made(leaf.value().clone())),
            MenuRow::Parent { key, path } => {
                let children = match self.tree.node_at(&path) {
                    Some(Node::Parent(parent)) => parent.children(),
                    _ => {
                        tracing::warn!(
                            target: MENU_TARGET,
                            stack_id = %self.stack.id(),
                            key = %key,
                            "submitted group is no longer in the tree"
                        );
                        return Propagation::Stop;
                    }
                };
                let level =
                    MenuLevel::from_nodes(children, &path, self.config.navigation.viewport_rows);
                let _ = self.stack.push(FrameSpec::new(level).titled(key));
            }
        }
        Propagation::Stop
    }

    /// Offer a command to the menu. Commands for other stacks continue
    /// propagating untouched.
    pub fn handle_command(&mut self, command: &mut Command<LevelSpec<T>>) -> Propagation {
        if !command.targets(self.stack.id()) {
            return Propagation::Continue;
        }
        let table = Rc::clone(&self.commands);
        table.dispatch(self, command)
    }

    /// Translate `key` for this menu's stack and handle it.
    pub fn handle_key(&mut self, key: NavigationKey) -> Propagation {
        match key.command(self.stack.id()) {
            Some(mut command) => self.handle_command(&mut command),
            None => Propagation::Continue,
        }
    }

    /// Activate the top level's back affordance, if it has one.
    pub fn activate_back(&mut self) -> Propagation {
        let command = self
            .stack
            .try_peek()
            .and_then(|frame| frame.back_command(self.stack.id()));
        match command {
            Some(mut command) => self.handle_command(&mut command),
            None => Propagation::Continue,
        }
    }
}

impl<T: Clone + 'static> CommandReceiver<LevelSpec<T>> for SearchableMenu<T> {
    fn receive(&mut self, command: &mut Command<LevelSpec<T>>) -> Propagation {
        self.handle_command(command)
    }
}
