#![forbid(unsafe_code)]

//! Slash-delimited menu path segmentation.
//!
//! A path such as `Rendering/Post FX/Bloom` names a leaf (`Bloom`) and the
//! chain of parents leading to it. A backslash-escaped slash (`\/`) is a
//! literal `/` inside a single segment, so `Units/km\/h` has two segments:
//! `Units` and `km/h`.
//!
//! # Grammar
//!
//! ```text
//! path     := (interior '/')* leaf
//! interior := ('\/' | [^/])*       (may be empty)
//! leaf     := ('\/' | [^/])+       (never empty)
//! ```
//!
//! The escape works the same in the leaf as in interior segments, so
//! `Foo/\/` names a leaf called `/`. The backslash of an escape is dropped;
//! a backslash that does not precede a slash is kept verbatim.
//!
//! # Failure Modes
//!
//! - Empty input: [`PathError::Empty`].
//! - Unescaped trailing `/` (empty leaf): [`PathError::TrailingSeparator`].

use std::fmt;

/// Segment separator.
pub const SEPARATOR: char = '/';
/// Escape character; only meaningful directly before [`SEPARATOR`].
pub const ESCAPE: char = '\\';

/// Why a path was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string is empty.
    Empty,
    /// The path ends with an unescaped separator, leaving no leaf name.
    TrailingSeparator,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "path is empty"),
            Self::TrailingSeparator => write!(f, "path ends with a separator and names no leaf"),
        }
    }
}

impl std::error::Error for PathError {}

/// A successfully segmented path.
///
/// Invariant: `segments` is non-empty and the last segment is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPath {
    segments: Vec<String>,
}

impl MenuPath {
    /// Segment `raw` according to the escaped-slash grammar.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                ESCAPE if chars.peek() == Some(&SEPARATOR) => {
                    chars.next();
                    current.push(SEPARATOR);
                }
                SEPARATOR => segments.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }

        if current.is_empty() {
            return Err(PathError::TrailingSeparator);
        }
        segments.push(current);
        Ok(Self { segments })
    }

    /// All segments, parents first, leaf last.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Parent segments (everything but the leaf).
    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The leaf segment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Number of segments.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}
