//! Undo/redo history
//!
//! Stores the [`EditRecord`]s produced by the formatting engine (and by
//! plain typing) so they can be replayed in either direction. Records are
//! exact replacements, so undo restores the previous text byte for byte.

use crate::markdown::{EditRecord, Selection};
use log::debug;

/// Default maximum number of undo steps kept.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Bounded undo and redo stacks of edit records.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditRecord>,
    redo_stack: Vec<EditRecord>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl EditHistory {
    /// Create an empty history keeping at most `max_size` undo steps.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record a new edit. No-op edits are ignored.
    ///
    /// Clears the redo stack (new edits invalidate redo history) and drops
    /// the oldest entry once the history is full.
    pub fn record(&mut self, edit: EditRecord) {
        if edit.is_noop() {
            return;
        }
        self.undo_stack.push(edit);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the most recent edit against `text`.
    ///
    /// Returns the restored text and a selection over the restored span, or
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self, text: &str) -> Option<(String, Selection)> {
        let edit = self.undo_stack.pop()?;
        let restored = edit.revert(text);
        let selection = edit.inverse().inserted_range();
        debug!(
            "Undo: restored {}..{}",
            selection.start, selection.end
        );
        self.redo_stack.push(edit);
        Some((restored, selection))
    }

    /// Redo the most recently undone edit against `text`.
    ///
    /// Returns the new text and the caret after the re-applied span.
    pub fn redo(&mut self, text: &str) -> Option<(String, Selection)> {
        let edit = self.redo_stack.pop()?;
        let replayed = edit.apply_to(text);
        let selection = Selection::caret(edit.inserted_range().end);
        debug!("Redo: re-applied edit at {}", edit.range.start);
        self.undo_stack.push(edit);
        Some((replayed, selection))
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of items in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of items in the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
