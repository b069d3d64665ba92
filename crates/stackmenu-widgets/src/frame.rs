#![forbid(unsafe_code)]

//! Frames: one pushable layer of content plus an optional header.
//!
//! Frames are owned by a [`NavigationStack`](crate::stack::NavigationStack).
//! Callers describe a frame with a [`FrameSpec`]; the stack assigns the id,
//! drives the [`FramePhase`] state machine, and maintains [`FrameFlags`].
//!
//! # Lifecycle
//!
//! ```text
//! Initial ──push──▶ Entering ──enter done/cancelled──▶ Stable
//!                                                        │
//!                            Detached ◀──exit done/cancelled── Leaving ◀──pop──┘
//! ```

use stackmenu_core::command::{Command, CommandKind, StackId};
use stackmenu_core::error::FrameId;

/// Frame lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FramePhase {
    /// Queued but not yet attached.
    #[default]
    Initial,
    /// Attached and animating in.
    Entering,
    /// At rest.
    Stable,
    /// Animating out.
    Leaving,
    /// Removed from the stack. Terminal.
    Detached,
}

impl FramePhase {
    /// Whether a transition is running.
    #[inline]
    #[must_use]
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Entering | Self::Leaving)
    }
}

bitflags::bitflags! {
    /// Visual container state mirrored to the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameFlags: u8 {
        const NONE      = 0b0000;
        /// Present in the host's visual tree.
        const ATTACHED  = 0b0001;
        /// Takes part in layout.
        const DISPLAYED = 0b0010;
        /// Drawn (possibly mid-transition).
        const VISIBLE   = 0b0100;
        /// Accepts interaction.
        const ENABLED   = 0b1000;
        const SHOWN     = Self::ATTACHED.bits() | Self::DISPLAYED.bits() | Self::VISIBLE.bits();
    }
}

/// Title row of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub text: String,
    /// Show a back affordance that pops the owning stack.
    pub back_enabled: bool,
}

impl FrameHeader {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            back_enabled: false,
        }
    }

    #[must_use]
    pub fn with_back(mut self, enabled: bool) -> Self {
        self.back_enabled = enabled;
        self
    }
}

/// Description of a frame to push.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec<C> {
    pub header: Option<FrameHeader>,
    pub content: C,
}

impl<C> FrameSpec<C> {
    #[must_use]
    pub fn new(content: C) -> Self {
        Self {
            header: None,
            content,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: FrameHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Shorthand for a header with `text` and no explicit back setting; the
    /// stack enables back when the frame is pushed above another.
    #[must_use]
    pub fn titled(self, text: impl Into<String>) -> Self {
        self.with_header(FrameHeader::new(text))
    }
}

/// A frame owned by a stack.
#[derive(Debug)]
pub struct Frame<C> {
    id: FrameId,
    header: Option<FrameHeader>,
    content: C,
    phase: FramePhase,
    flags: FrameFlags,
}

impl<C> Frame<C> {
    pub(crate) fn from_spec(id: FrameId, spec: FrameSpec<C>) -> Self {
        Self {
            id,
            header: spec.header,
            content: spec.content,
            phase: FramePhase::Initial,
            flags: FrameFlags::NONE,
        }
    }

    #[must_use]
    pub fn id(&self) -> FrameId {
        self.id
    }

    #[must_use]
    pub fn header(&self) -> Option<&FrameHeader> {
        self.header.as_ref()
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    #[must_use]
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// Consume the frame, returning its content.
    #[must_use]
    pub fn into_content(self) -> C {
        self.content
    }

    #[must_use]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    #[must_use]
    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(FrameFlags::ENABLED)
    }

    #[inline]
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.flags.contains(FrameFlags::DISPLAYED)
    }

    /// The command the header's back affordance sends, if it has one.
    #[must_use]
    pub fn back_command<P>(&self, stack_id: &StackId) -> Option<Command<P>> {
        self.header
            .as_ref()
            .filter(|header| header.back_enabled)
            .map(|_| Command::new(CommandKind::Back, stack_id.clone()))
    }

    pub(crate) fn header_mut(&mut self) -> Option<&mut FrameHeader> {
        self.header.as_mut()
    }

    pub(crate) fn set_phase(&mut self, phase: FramePhase) {
        self.phase = phase;
    }

    /// Returns `true` when the flag actually changed.
    pub(crate) fn set_flag(&mut self, flag: FrameFlags, on: bool) -> bool {
        let before = self.flags;
        self.flags.set(flag, on);
        before != self.flags
    }

    pub(crate) fn clear_flags(&mut self) {
        self.flags = FrameFlags::NONE;
    }
}
