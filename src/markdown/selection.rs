//! Selection ranges over a text buffer.
//!
//! A [`Selection`] is a half-open range of character offsets. An empty range
//! is a caret. Every engine call takes one and hands one back, so nothing
//! about the cursor is kept between calls.

use crate::error::{Error, Result};
use crate::string_utils::{char_len, char_slice};
use log::warn;

/// Half-open `[start, end)` range of character offsets into a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection, swapping reversed bounds.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// An empty selection (insertion point) at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Select the whole of `text`.
    pub fn all(text: &str) -> Self {
        Self::new(0, char_len(text))
    }

    /// Build a selection and reject bounds that fall outside `text`.
    ///
    /// Use this where offsets come from outside the editor (e.g. the command
    /// line); the engine itself clamps instead.
    pub fn checked(text: &str, start: usize, end: usize) -> Result<Self> {
        let len = char_len(text);
        let selection = Self::new(start, end);
        if selection.end > len {
            return Err(Error::InvalidRange { start, end, len });
        }
        Ok(selection)
    }

    /// Whether this is a caret with nothing selected.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range is empty (same as [`Selection::is_caret`]).
    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// Clamp both bounds into `[0, chars(text)]`.
    ///
    /// UI selection tracking can race with buffer edits, so out-of-range
    /// offsets are pulled back to the buffer end rather than rejected.
    pub fn clamp_to(self, text: &str) -> Self {
        let len = char_len(text);
        if self.end <= len {
            return self;
        }
        warn!(
            "Selection {}..{} exceeds buffer length {}, clamping",
            self.start, self.end, len
        );
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// The text covered by this selection.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        char_slice(text, self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for Selection {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
