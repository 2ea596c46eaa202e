//! mdedit
//!
//! A markdown formatting engine with a document host and undo history.
//! The engine in [`markdown`] is pure: every command takes the text and a
//! [`markdown::Selection`] and returns the new text plus an
//! [`markdown::EditRecord`]. [`editor::Document`] keeps the buffer, selection
//! and history between commands, and [`files`] reads and writes documents.

pub mod config;
pub mod editor;
pub mod error;
pub mod files;
pub mod markdown;
pub mod string_utils;
