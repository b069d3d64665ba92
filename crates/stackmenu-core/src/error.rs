#![forbid(unsafe_code)]

//! Error taxonomy shared by every stackmenu crate.
//!
//! # Design Principles
//!
//! 1. **Invariant violations are synchronous**: a broken caller contract
//!    (popping or peeking an empty stack, naming a frame the stack does not own)
//!    surfaces as an `Err` from the call that broke it, never later when a
//!    pending operation settles.
//! 2. **Malformed data is not an error here**: unparsable paths are recovered
//!    locally by the tree builder and reported through
//!    [`crate::tree::TreeReport`].
//! 3. **Cancellation is not an error**: it is a terminal outcome of an
//!    operation handle.

use std::fmt;

use crate::command::StackId;

/// Identifier of a frame owned by a navigation stack.
pub type FrameId = u64;

/// A broken programmer contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `pop()` or `peek()` on a stack with no frames (after queued operations).
    EmptyStack { stack_id: StackId },
    /// A frame id that the stack does not own.
    UnknownFrame { frame_id: FrameId },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStack { stack_id } => write!(f, "stack '{stack_id}' is empty"),
            Self::UnknownFrame { frame_id } => write!(f, "frame {frame_id} is not owned by this stack"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Standard result type for invariant-checked APIs.
pub type Result<T> = std::result::Result<T, InvariantViolation>;
