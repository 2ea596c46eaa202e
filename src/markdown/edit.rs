//! Reversible edit records.
//!
//! Every mutating engine call describes its change as an [`EditRecord`]:
//! the range it replaced, the text that was there and the text that
//! replaced it. The host pushes these onto its undo history and replays
//! them in either direction.

use crate::markdown::Selection;
use crate::string_utils::{char_len, replace_char_range};

/// A single `(range, before, after)` replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// Replaced range, in character offsets of the pre-edit buffer
    pub range: Selection,
    /// Text that occupied `range` before the edit
    pub before: String,
    /// Text that occupies the range after the edit
    pub after: String,
}

impl EditRecord {
    pub fn new(range: Selection, before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            range,
            before: before.into(),
            after: after.into(),
        }
    }

    /// Span occupied by `after` in the post-edit buffer.
    pub fn inserted_range(&self) -> Selection {
        Selection::new(self.range.start, self.range.start + char_len(&self.after))
    }

    /// Whether applying this edit leaves the buffer unchanged.
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    /// Replay the edit on the pre-edit buffer (redo).
    pub fn apply_to(&self, text: &str) -> String {
        let end = self.range.start + char_len(&self.before);
        replace_char_range(text, self.range.start, end, &self.after)
    }

    /// Restore `before` over the span `after` now occupies (undo).
    pub fn revert(&self, text: &str) -> String {
        let inserted = self.inserted_range();
        replace_char_range(text, inserted.start, inserted.end, &self.before)
    }

    /// The edit that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            range: self.inserted_range(),
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }
}
