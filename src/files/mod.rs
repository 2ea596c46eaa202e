//! File operations module for mdedit
//!
//! This module recognises markdown file types and loads/saves documents
//! as UTF-8 text.

mod io;

pub use io::{is_markdown_path, load, save, MARKDOWN_EXTENSIONS};
