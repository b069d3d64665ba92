#![forbid(unsafe_code)]

//! Top-level error for hosts that use the whole stackmenu surface.
//!
//! Each sub-crate keeps its own typed error; this enum only gathers them so
//! a host can `?` across both with one result type.

use std::fmt;

use stackmenu_core::error::InvariantViolation;
use stackmenu_core::path::PathError;
use stackmenu_widgets::config::ConfigError;

/// Any stackmenu failure.
#[derive(Debug)]
pub enum Error {
    /// A caller broke a stack contract.
    Invariant(InvariantViolation),
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// A menu path did not parse.
    Path(PathError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invariant(err) => write!(f, "invariant violation: {err}"),
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Path(err) => write!(f, "menu path error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invariant(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Path(err) => Some(err),
        }
    }
}

impl From<InvariantViolation> for Error {
    fn from(err: InvariantViolation) -> Self {
        Self::Invariant(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<PathError> for Error {
    fn from(err: PathError) -> Self {
        Self::Path(err)
    }
}

/// Standard result type for stackmenu hosts.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use stackmenu_core::command::StackId;
    use stackmenu_core::path::MenuPath;

    fn parse(raw: &str) -> Result<MenuPath> {
        Ok(MenuPath::parse(raw)?)
    }

    #[test]
    fn path_errors_convert() {
        let err = parse("a/").unwrap_err();
        assert!(matches!(err, Error::Path(PathError::TrailingSeparator)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn invariant_display_is_prefixed() {
        let err: Error = InvariantViolation::EmptyStack {
            stack_id: StackId::new("menu"),
        }
        .into();
        assert_eq!(err.to_string(), "invariant violation: stack 'menu' is empty");
    }

    #[test]
    fn config_errors_convert() {
        let err: Error = ConfigError::Validation(vec!["bad".into()]).into();
        assert!(err.to_string().starts_with("configuration error"));
    }
}
