//! Document host
//!
//! [`Document`] owns what the formatting engine deliberately does not: the
//! text buffer, the current selection, the file path and the undo history.
//! Each editing command hands the current `(text, selection)` to the engine,
//! commits the result and records the edit.

use crate::editor::history::{EditHistory, DEFAULT_MAX_HISTORY};
use crate::error::{Error, Result};
use crate::files;
use crate::markdown::{
    self, EditRecord, FormatResult, FormattingState, MarkdownConstruct, Selection,
};
use crate::string_utils::char_len;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// An open markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    selection: Selection,
    /// File path (None for unsaved/new documents)
    path: Option<PathBuf>,
    /// Text as last loaded or saved (for detecting modifications)
    saved_text: String,
    history: EditHistory,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create an unsaved document with initial text and the caret at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            selection: Selection::caret(char_len(&text)),
            saved_text: text.clone(),
            text,
            path: None,
            history: EditHistory::new(DEFAULT_MAX_HISTORY),
        }
    }

    /// Replace the undo history with one keeping at most `max_size` steps.
    pub fn with_history_limit(mut self, max_size: usize) -> Self {
        self.history = EditHistory::new(max_size);
        self
    }

    /// Open a markdown file.
    ///
    /// # Errors
    ///
    /// Propagates `files::load` errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = files::load(&path)?;
        let mut document = Self::with_text(text);
        document.path = Some(path);
        Ok(document)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The text currently selected.
    pub fn selected_text(&self) -> &str {
        self.selection.slice(&self.text)
    }

    /// Move the selection, clamping it to the buffer.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(&self.text);
    }

    /// Check if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.text != self.saved_text
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a construct to the current selection.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConstructParameter` for an invalid header level;
    /// the document is left unchanged.
    pub fn apply(&mut self, construct: &MarkdownConstruct) -> Result<()> {
        let result = markdown::apply(&self.text, self.selection, construct)?;
        self.commit(result);
        Ok(())
    }

    /// Strip all markup from the selection (or the whole document at a caret).
    pub fn clear_selection(&mut self) -> bool {
        let result = markdown::clear_selection(&self.text, self.selection);
        self.commit(result)
    }

    /// Remove one construct's markup at the selection.
    pub fn clear_construct(&mut self, construct: &MarkdownConstruct) -> bool {
        let result = markdown::clear_construct(&self.text, self.selection, construct);
        self.commit(result)
    }

    /// Whether `construct` is active at the current selection.
    pub fn is_active(&self, construct: &MarkdownConstruct) -> bool {
        markdown::detect(&self.text, self.selection, construct)
    }

    /// Toolbar highlight state at the current selection.
    pub fn formatting_state(&self) -> FormattingState {
        markdown::detect_formatting_state(&self.text, self.selection)
    }

    /// Remove the construct if it is active, otherwise apply it.
    ///
    /// Returns `true` if markup was added, `false` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConstructParameter` for an invalid header level.
    pub fn toggle(&mut self, construct: &MarkdownConstruct) -> Result<bool> {
        construct.validate()?;
        if self.is_active(construct) {
            self.clear_construct(construct);
            Ok(false)
        } else {
            self.apply(construct)?;
            Ok(true)
        }
    }

    /// Replace the selection with typed or pasted text.
    pub fn replace_selection(&mut self, replacement: &str) {
        let selection = self.selection;
        let before = selection.slice(&self.text).to_string();
        let edit = EditRecord::new(selection, before, replacement);
        let text = edit.apply_to(&self.text);
        let caret = edit.inserted_range().end;
        self.commit(FormatResult {
            text,
            selection: Selection::caret(caret),
            edit,
            applied: true,
        });
    }

    /// Append a final newline to a non-empty buffer that lacks one.
    ///
    /// The selection is kept. Returns `true` if the buffer changed.
    pub fn ensure_trailing_newline(&mut self) -> bool {
        if self.text.is_empty() || self.text.ends_with('\n') {
            return false;
        }
        let selection = self.selection;
        self.selection = Selection::caret(char_len(&self.text));
        self.replace_selection("\n");
        self.selection = selection;
        true
    }

    /// Undo the last edit.
    ///
    /// Returns `true` if undo was performed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.text) {
            Some((text, selection)) => {
                self.text = text;
                self.selection = selection;
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit.
    ///
    /// Returns `true` if redo was performed.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.text) {
            Some((text, selection)) => {
                self.text = text;
                self.selection = selection;
                true
            }
            None => false,
        }
    }

    /// Take an engine result as the new document state.
    fn commit(&mut self, result: FormatResult) -> bool {
        let changed = result.changed();
        if changed {
            debug!(
                "Committed edit at {}..{}",
                result.edit.range.start, result.edit.range.end
            );
            self.history.record(result.edit);
        }
        self.text = result.text;
        self.selection = result.selection;
        changed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Save to the document's current path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Application` for a document that has never been saved,
    /// or the `files::save` error. The buffer is never changed by a failed save.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or_else(|| {
            Error::Application("Document has no file path; use save as".to_string())
        })?;
        self.write_to(&path)
    }

    /// Save to `path` and make it the document's path.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.write_to(&path)?;
        self.path = Some(path);
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        files::save(path, &self.text)?;
        self.saved_text = self.text.clone();
        info!("Document saved to {}", path.display());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
