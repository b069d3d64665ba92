#![forbid(unsafe_code)]

//! Core: menu paths, hierarchy building, fuzzy search, and commands.
//!
//! # Role in stackmenu
//! `stackmenu-core` holds the pure, host-independent pieces. Nothing in here
//! knows about frames, time, or rendering.
//!
//! # Primary responsibilities
//! - **MenuPath**: escaped-slash path segmentation.
//! - **PathTree**: flat entries to a sorted parent/leaf hierarchy.
//! - **SearchIndex**: one row per search term, ranked by a pluggable scorer.
//! - **Command**: stack-scoped navigation requests and handler tables.
//!
//! # How it fits in the system
//! `stackmenu-widgets` builds the navigation stack and the searchable picker
//! on top of these types. The `stackmenu` facade re-exports both.

pub mod command;
pub mod error;
pub mod logging;
pub mod path;
pub mod search;
pub mod tree;

pub use command::{Command, CommandKind, CommandTable, CommandTag, Propagation, StackId};
pub use error::{FrameId, InvariantViolation};
pub use path::{MenuPath, PathError};
pub use search::{
    DEFAULT_CUTOFF, Ranker, SearchHit, SearchIndex, SearchIndexEntry, SearchOutcome, WeightedRatio,
};
pub use tree::{Entry, LeafNode, Node, NodeKind, ParentNode, PathTree, TreeReport};

// Re-export tracing macros at crate root for ergonomic use.
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
