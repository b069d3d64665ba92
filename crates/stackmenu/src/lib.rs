#![forbid(unsafe_code)]

//! stackmenu public facade crate.
//!
//! Re-exports the hierarchy, search, and command types from
//! `stackmenu-core` and the navigation stack and picker from
//! `stackmenu-widgets`, plus a prelude for day-to-day use.
//!
//! # Example
//!
//! ```
//! use stackmenu::prelude::*;
//!
//! let mut menu = SearchableMenu::new("add-component");
//! menu.set_header_text("Add Component");
//! let report = menu.refresh(vec![
//!     Entry::new("Physics/Rigidbody", "rigidbody").term("Physics Body"),
//!     Entry::new("Rendering/Camera", "camera"),
//! ]);
//! assert!(report.is_clean());
//!
//! for c in "camera".chars() {
//!     menu.handle_key(NavigationKey::Char(c));
//! }
//! menu.handle_key(NavigationKey::Next);
//! menu.handle_key(NavigationKey::Submit);
//! assert_eq!(menu.drain_selections(), vec![Selection::Made("camera")]);
//! ```

pub mod error;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use stackmenu_core::command::{
    Command, CommandKind, CommandTable, CommandTag, Propagation, StackId,
};
pub use stackmenu_core::error::{FrameId, InvariantViolation};
pub use stackmenu_core::path::{MenuPath, PathError};
pub use stackmenu_core::search::{
    DEFAULT_CUTOFF, Ranker, SearchHit, SearchIndex, SearchOutcome, WeightedRatio,
};
pub use stackmenu_core::tree::{Entry, LeafNode, Node, NodeKind, PathTree, TreeReport};

#[cfg(feature = "tracing-json")]
pub use stackmenu_core::logging::init_json_logging;

// --- Widget re-exports -----------------------------------------------------

pub use stackmenu_widgets::config::{ConfigError, MenuConfig};
pub use stackmenu_widgets::frame::{Frame, FrameHeader, FramePhase, FrameSpec};
pub use stackmenu_widgets::keys::NavigationKey;
pub use stackmenu_widgets::menu::{MenuLevel, MenuRow, SearchableMenu, Selection};
pub use stackmenu_widgets::router::{CommandReceiver, CommandRouter};
pub use stackmenu_widgets::stack::{
    NavigationStack, OperationHandle, OperationOutcome, OperationStatus, StackEvent,
};
pub use stackmenu_widgets::transition::TransitionConfig;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Command, CommandKind, CommandRouter, Entry, Error, FrameSpec, MenuConfig, NavigationKey,
        NavigationStack, OperationOutcome, Propagation, Result, SearchableMenu, Selection,
        StackId,
    };

    pub use crate::{core, widgets};
}

pub use stackmenu_core as core;
pub use stackmenu_widgets as widgets;
