#![forbid(unsafe_code)]

//! Logging facade.
//!
//! All stackmenu crates log through `tracing`. Hosts install whatever
//! subscriber they like; with the `tracing-json` feature,
//! [`init_json_logging`] installs a line-delimited JSON subscriber filtered by
//! `RUST_LOG` (default `warn`).
//!
//! Targets in use:
//!
//! | target             | level  | emitted when                                |
//! |--------------------|--------|---------------------------------------------|
//! | `stackmenu::tree`  | warn   | a menu entry is rejected                    |
//! | `stackmenu::tree`  | debug  | a tree finishes building                    |
//! | `stackmenu::stack` | debug  | a stack operation is queued/started/settled |
//! | `stackmenu::menu`  | error  | a host callback panicked                    |
//! | `stackmenu::router`| warn   | a busy receiver was skipped                 |

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Target for tree building diagnostics.
pub const TREE_TARGET: &str = "stackmenu::tree";
/// Target for navigation stack scheduling.
pub const STACK_TARGET: &str = "stackmenu::stack";
/// Target for picker callbacks and command handling.
pub const MENU_TARGET: &str = "stackmenu::menu";
/// Target for command routing.
pub const ROUTER_TARGET: &str = "stackmenu::router";

/// Install a global JSON subscriber honoring `RUST_LOG`.
///
/// Returns an error if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
}
