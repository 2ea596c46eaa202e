//! Editor module for mdedit
//!
//! This module holds the editing state around the formatting engine: the
//! open [`Document`] and its undo/redo [`EditHistory`].

mod document;
mod history;

pub use document::Document;
pub use history::{EditHistory, DEFAULT_MAX_HISTORY};
