#![forbid(unsafe_code)]

//! The per-level search query field.
//!
//! Editing happens at the end of the text only. Deletion is grapheme-cluster
//! aware, so a backspace removes a whole user-perceived character.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Query text plus focus state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchField {
    text: String,
    focused: bool,
}

impl SearchField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// No query beyond whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Take focus, appending `seed` when given.
    pub fn focus(&mut self, seed: Option<char>) {
        self.focused = true;
        if let Some(c) = seed {
            self.insert_char(c);
        }
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Append a character. Control characters are ignored.
    pub fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Replace the whole query.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().filter(|c| !c.is_control()).collect();
    }

    /// Remove the last grapheme. Returns `false` on an empty field.
    pub fn backspace(&mut self) -> bool {
        match self.text.grapheme_indices(true).next_back() {
            Some((start, _)) => {
                self.text.truncate(start);
                true
            }
            None => false,
        }
    }

    /// Clear the query, keeping focus as is.
    pub fn reset(&mut self) {
        self.text.clear();
    }

    /// Number of graphemes.
    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Terminal cell width of the query.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.text.width()
    }
}
