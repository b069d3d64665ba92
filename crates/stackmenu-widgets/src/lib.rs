#![forbid(unsafe_code)]

//! Navigation stack and searchable picker for stackmenu.

pub mod config;
pub mod frame;
pub mod keys;
pub mod menu;
pub mod router;
pub mod stack;
pub mod transition;

pub use config::{ConfigError, MenuConfig, NavigationPolicy, SearchPolicy, TransitionPolicy};
pub use frame::{Frame, FrameFlags, FrameHeader, FramePhase, FrameSpec};
pub use keys::NavigationKey;
pub use menu::{LevelFocus, LevelSpec, MenuLevel, MenuRow, SearchField, SearchableMenu, Selection};
pub use router::{CommandReceiver, CommandRouter, ReceiverId, SharedReceiver};
pub use stack::{
    NavigationStack, OperationHandle, OperationId, OperationOutcome, OperationStatus,
    OperationTicket, PopHandle, StackEvent,
};
pub use transition::{
    EntranceKind, Easing, ExitKind, FrameTransition, TransitionConfig, TransitionDirection,
    TransitionValues,
};
