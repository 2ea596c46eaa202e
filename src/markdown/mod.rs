//! Markdown formatting engine
//!
//! This module turns toolbar commands into text edits. It is stateless:
//! callers hand in the current text and [`Selection`] and get back the new
//! text, the selection to place and an [`EditRecord`] for the undo history.
//!
//! # Features
//! - Apply bold, italic, strikethrough, headers, lists, checklists,
//!   blockquotes, code blocks, tables, links and images
//! - Detect whether a construct is active at the caret or selection
//! - Remove a single construct, or clear all markup from a selection
//!
//! # Example
//! ```ignore
//! use mdedit::markdown::{apply, clear_selection, detect, MarkdownConstruct, Selection};
//!
//! let bold = MarkdownConstruct::Bold;
//! let result = apply("hello world", Selection::new(0, 5), &bold)?;
//! assert!(detect(&result.text, result.edit.inserted_range(), &bold));
//!
//! let cleared = clear_selection(&result.text, result.edit.inserted_range());
//! assert_eq!(cleared.text, "hello world");
//! ```

mod clear;
mod construct;
mod edit;
mod formatting;
mod selection;

pub use clear::{clear_selection, strip_markup};
pub use construct::{
    ConstructKind, MarkdownConstruct, DEFAULT_TABLE_ROWS, MAX_HEADER_LEVEL, MIN_HEADER_LEVEL,
};
pub use edit::EditRecord;
pub use formatting::{
    apply, clear_construct, detect, detect_formatting_state, FormatResult, FormattingState,
};
pub use selection::Selection;
