#![forbid(unsafe_code)]

//! Typed navigation commands and kind-keyed handler tables.
//!
//! A [`Command`] is a small value: a [`CommandKind`] discriminator, the
//! [`StackId`] it targets, and an optional payload (a frame to push).
//! Receivers look handlers up in a [`CommandTable`] by [`CommandTag`] instead
//! of matching on a class hierarchy.
//!
//! # Example
//!
//! ```
//! use stackmenu_core::command::{Command, CommandKind, CommandTable, CommandTag, Propagation};
//!
//! #[derive(Default)]
//! struct Counter { backs: u32 }
//!
//! let mut table: CommandTable<Counter> = CommandTable::new();
//! table.register(CommandTag::Back, |counter, _cmd| {
//!     counter.backs += 1;
//!     Propagation::Stop
//! });
//!
//! let mut counter = Counter::default();
//! let mut back = Command::new(CommandKind::Back, "menu");
//! assert_eq!(table.dispatch(&mut counter, &mut back), Propagation::Stop);
//! let mut top = Command::new(CommandKind::Top, "menu");
//! assert_eq!(table.dispatch(&mut counter, &mut top), Propagation::Continue);
//! assert_eq!(counter.backs, 1);
//! ```

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

/// Identity of a navigation stack. Commands are matched against it by
/// equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackId(Arc<str>);

impl StackId {
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StackId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// What a command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Leave the current level (pop), or cancel at the root.
    Back,
    /// Activate the selected row.
    Submit,
    /// Move input to the search field, seeded with a character.
    Search(char),
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    /// Push the payload frame.
    PushFrame,
    /// Pop the top frame if there is one.
    PopFrame,
}

impl CommandKind {
    /// Payload-free discriminator used for table lookups.
    #[must_use]
    pub const fn tag(self) -> CommandTag {
        match self {
            Self::Back => CommandTag::Back,
            Self::Submit => CommandTag::Submit,
            Self::Search(_) => CommandTag::Search,
            Self::Up => CommandTag::Up,
            Self::Down => CommandTag::Down,
            Self::PageUp => CommandTag::PageUp,
            Self::PageDown => CommandTag::PageDown,
            Self::Top => CommandTag::Top,
            Self::Bottom => CommandTag::Bottom,
            Self::PushFrame => CommandTag::PushFrame,
            Self::PopFrame => CommandTag::PopFrame,
        }
    }
}

/// Fieldless mirror of [`CommandKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTag {
    Back,
    Submit,
    Search,
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    PushFrame,
    PopFrame,
}

impl CommandTag {
    /// Every tag, in declaration order.
    pub const ALL: [CommandTag; 11] = [
        Self::Back,
        Self::Submit,
        Self::Search,
        Self::Up,
        Self::Down,
        Self::PageUp,
        Self::PageDown,
        Self::Top,
        Self::Bottom,
        Self::PushFrame,
        Self::PopFrame,
    ];
}

/// Whether a command should keep bubbling to outer receivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

impl Propagation {
    #[inline]
    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// A stack-scoped navigation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Command<P = ()> {
    kind: CommandKind,
    stack_id: StackId,
    payload: Option<P>,
}

impl<P> Command<P> {
    /// A command without payload.
    #[must_use]
    pub fn new(kind: CommandKind, stack_id: impl Into<StackId>) -> Self {
        Self {
            kind,
            stack_id: stack_id.into(),
            payload: None,
        }
    }

    /// A [`CommandKind::PushFrame`] carrying the frame to push.
    #[must_use]
    pub fn push_frame(stack_id: impl Into<StackId>, frame: P) -> Self {
        Self {
            kind: CommandKind::PushFrame,
            stack_id: stack_id.into(),
            payload: Some(frame),
        }
    }

    /// A [`CommandKind::PopFrame`].
    #[must_use]
    pub fn pop_frame(stack_id: impl Into<StackId>) -> Self {
        Self::new(CommandKind::PopFrame, stack_id)
    }

    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub fn stack_id(&self) -> &StackId {
        &self.stack_id
    }

    /// True when this command targets `stack_id`.
    #[must_use]
    pub fn targets(&self, stack_id: &StackId) -> bool {
        &self.stack_id == stack_id
    }

    #[must_use]
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    /// Move the payload out; later calls return `None`.
    pub fn take_payload(&mut self) -> Option<P> {
        self.payload.take()
    }
}

/// Handler signature stored in a [`CommandTable`].
pub type CommandHandler<Ctx, P> = fn(&mut Ctx, &mut Command<P>) -> Propagation;

/// Lookup table from command tag to handler, built once per receiver type.
pub struct CommandTable<Ctx, P = ()> {
    handlers: AHashMap<CommandTag, CommandHandler<Ctx, P>>,
}

impl<Ctx, P> Default for CommandTable<Ctx, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx, P> fmt::Debug for CommandTable<Ctx, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().collect();
        tags.sort_by_key(|tag| CommandTag::ALL.iter().position(|t| t == *tag));
        f.debug_struct("CommandTable").field("tags", &tags).finish()
    }
}

impl<Ctx, P> CommandTable<Ctx, P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: AHashMap::new(),
        }
    }

    /// Register (or replace) the handler for `tag`.
    pub fn register(&mut self, tag: CommandTag, handler: CommandHandler<Ctx, P>) -> &mut Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, tag: CommandTag, handler: CommandHandler<Ctx, P>) -> Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// Whether a handler exists for `tag`.
    #[must_use]
    pub fn handles(&self, tag: CommandTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    /// Run the handler for the command's kind. Unhandled kinds continue
    /// propagating.
    pub fn dispatch(&self, ctx: &mut Ctx, command: &mut Command<P>) -> Propagation {
        match self.handlers.get(&command.kind.tag()) {
            Some(handler) => handler(ctx, command),
            None => Propagation::Continue,
        }
    }
}
