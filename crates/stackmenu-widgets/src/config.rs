#![forbid(unsafe_code)]

//! Tunables for the navigation stack and the searchable menu.
//!
//! [`MenuConfig`] groups every knob into one struct that can be loaded from
//! TOML or JSON at startup (with the `config` feature).
//!
//! # Loading
//!
//! ```toml
//! # stackmenu.toml
//! [transition]
//! entrance = "fade_in"
//! entrance_ms = 120
//! reduced_motion = true
//!
//! [search]
//! cutoff = 80
//!
//! [navigation]
//! viewport_rows = 12
//! ```
//!
//! ```rust,ignore
//! let config = MenuConfig::from_toml_file("stackmenu.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! `MenuConfig::default()` matches the widgets' built-in behavior: 200 ms
//! slide-in, 150 ms slide-out, cutoff 75, aliases collapsed, 10-row pages.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::transition::{Easing, EntranceKind, ExitKind, TransitionConfig};
use stackmenu_core::search::DEFAULT_CUTOFF;

/// Longest transition accepted by [`MenuConfig::validate`].
pub const MAX_TRANSITION_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Top-level MenuConfig
// ---------------------------------------------------------------------------

/// All stackmenu tunables.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MenuConfig {
    /// Frame enter/exit animation.
    pub transition: TransitionPolicy,
    /// Fuzzy search behavior.
    pub search: SearchPolicy,
    /// Keyboard navigation.
    pub navigation: NavigationPolicy,
}

impl MenuConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every value is in range. An empty list means the config is
    /// valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.transition.entrance_ms > MAX_TRANSITION_MS {
            errors.push(format!(
                "transition.entrance_ms must be <= {MAX_TRANSITION_MS}, got {}",
                self.transition.entrance_ms
            ));
        }
        if self.transition.exit_ms > MAX_TRANSITION_MS {
            errors.push(format!(
                "transition.exit_ms must be <= {MAX_TRANSITION_MS}, got {}",
                self.transition.exit_ms
            ));
        }
        if self.search.cutoff > 100 {
            errors.push(format!(
                "search.cutoff must be in 0..=100, got {}",
                self.search.cutoff
            ));
        }
        if self.navigation.viewport_rows == 0 {
            errors.push("navigation.viewport_rows must be > 0".into());
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the [`TransitionConfig`] for a navigation stack.
    #[must_use]
    pub fn to_transition_config(&self) -> TransitionConfig {
        let t = &self.transition;
        TransitionConfig {
            entrance: t.entrance,
            exit: t.exit,
            entrance_duration: Duration::from_millis(t.entrance_ms),
            exit_duration: Duration::from_millis(t.exit_ms),
            entrance_easing: t.entrance_easing,
            exit_easing: t.exit_easing,
            slide_distance: t.slide_distance,
            respect_reduced_motion: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Frame transition parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TransitionPolicy {
    pub entrance: EntranceKind,
    pub exit: ExitKind,
    pub entrance_ms: u64,
    pub exit_ms: u64,
    pub entrance_easing: Easing,
    pub exit_easing: Easing,
    /// Slide travel in cells.
    pub slide_distance: u16,
    /// Use short fades instead of the configured animation.
    pub reduced_motion: bool,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        let defaults = TransitionConfig::default();
        Self {
            entrance: defaults.entrance,
            exit: defaults.exit,
            entrance_ms: 200,
            exit_ms: 150,
            entrance_easing: defaults.entrance_easing,
            exit_easing: defaults.exit_easing,
            slide_distance: defaults.slide_distance,
            reduced_motion: false,
        }
    }
}

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SearchPolicy {
    /// Minimum similarity (0..=100) for a hit.
    pub cutoff: u8,
    /// Show a leaf once even when several of its terms match.
    pub collapse_aliases: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            collapse_aliases: true,
        }
    }
}

/// Keyboard navigation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NavigationPolicy {
    /// Rows moved by PageUp/PageDown when the host has not reported a
    /// viewport height.
    pub viewport_rows: usize,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self { viewport_rows: 10 }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to load or validate a [`MenuConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Values out of range.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
