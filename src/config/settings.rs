//! Settings data structures for mdedit
//!
//! This module defines the user preferences that shape editing commands:
//! the undo depth, the table and link templates, and the recent files list.

use crate::editor::DEFAULT_MAX_HISTORY;
use crate::markdown::{MarkdownConstruct, DEFAULT_TABLE_ROWS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Table Template
// ─────────────────────────────────────────────────────────────────────────────

/// The three rows inserted by the Table command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableTemplate {
    pub top: String,
    pub middle: String,
    pub bottom: String,
}

impl Default for TableTemplate {
    fn default() -> Self {
        let [top, middle, bottom] = DEFAULT_TABLE_ROWS;
        Self {
            top: top.to_string(),
            middle: middle.to_string(),
            bottom: bottom.to_string(),
        }
    }
}

impl TableTemplate {
    /// Build the Table construct for this template.
    pub fn to_construct(&self) -> MarkdownConstruct {
        MarkdownConstruct::Table {
            top: self.top.clone(),
            middle: self.middle.clone(),
            bottom: self.bottom.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences.
///
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of undo steps kept per document
    pub max_undo_history: usize,

    /// Rows inserted by the Table command
    pub table_template: TableTemplate,

    /// URL used for links and images when none is given
    pub default_link_url: String,

    /// Recently opened files (most recent first)
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,

    /// Append a final newline before saving
    pub trailing_newline_on_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_undo_history: DEFAULT_MAX_HISTORY,
            table_template: TableTemplate::default(),
            default_link_url: "https://".to_string(),
            recent_files: Vec::new(),
            max_recent_files: Self::DEFAULT_MAX_RECENT_FILES,
            trailing_newline_on_save: false,
        }
    }
}

impl Settings {
    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Link construct using `url`, or the default URL when none is given.
    pub fn link(&self, name: impl Into<String>, url: Option<String>) -> MarkdownConstruct {
        MarkdownConstruct::link(name, url.unwrap_or_else(|| self.default_link_url.clone()))
    }

    /// Image construct using `url`, or the default URL when none is given.
    pub fn image(&self, name: impl Into<String>, url: Option<String>) -> MarkdownConstruct {
        MarkdownConstruct::image(name, url.unwrap_or_else(|| self.default_link_url.clone()))
    }

    /// Link construct for the current selection.
    ///
    /// A selection that already is a link supplies the name and URL that were
    /// not given, so the result detects (and toggles off) that link. Otherwise
    /// the name defaults to the selected text and the URL to the default URL.
    pub fn link_for_selection(
        &self,
        selected: &str,
        name: Option<String>,
        url: Option<String>,
    ) -> MarkdownConstruct {
        match MarkdownConstruct::parse_link(selected) {
            Some(MarkdownConstruct::Link {
                name: existing_name,
                url: existing_url,
            }) => MarkdownConstruct::link(
                name.unwrap_or(existing_name),
                url.unwrap_or(existing_url),
            ),
            _ => self.link(name.unwrap_or_else(|| selected.to_string()), url),
        }
    }

    /// Image construct for the current selection (see [`Settings::link_for_selection`]).
    pub fn image_for_selection(
        &self,
        selected: &str,
        name: Option<String>,
        url: Option<String>,
    ) -> MarkdownConstruct {
        match MarkdownConstruct::parse_link(selected) {
            Some(MarkdownConstruct::Image {
                name: existing_name,
                url: existing_url,
            }) => MarkdownConstruct::image(
                name.unwrap_or(existing_name),
                url.unwrap_or(existing_url),
            ),
            _ => self.image(name.unwrap_or_else(|| selected.to_string()), url),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    pub const MIN_UNDO_HISTORY: usize = 1;
    pub const MAX_UNDO_HISTORY: usize = 10_000;
    pub const DEFAULT_MAX_RECENT_FILES: usize = 10;
    pub const MAX_RECENT_FILES: usize = 100;

    /// Clamp out-of-range values loaded from disk.
    pub fn sanitize(&mut self) {
        self.max_undo_history = self
            .max_undo_history
            .clamp(Self::MIN_UNDO_HISTORY, Self::MAX_UNDO_HISTORY);

        if self.max_recent_files == 0 {
            self.max_recent_files = Self::DEFAULT_MAX_RECENT_FILES;
        } else if self.max_recent_files > Self::MAX_RECENT_FILES {
            self.max_recent_files = Self::MAX_RECENT_FILES;
        }
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Deserialize from JSON and sanitize the result.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_undo_history, 100);
        assert_eq!(settings.max_recent_files, 10);
        assert!(settings.recent_files.is_empty());
        assert!(!settings.trailing_newline_on_save);
        assert_eq!(settings.table_template.to_construct(), MarkdownConstruct::table());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"max_undo_history": 7}"#).unwrap();
        assert_eq!(settings.max_undo_history, 7);
        assert_eq!(settings.default_link_url, "https://");
        assert_eq!(settings.table_template, TableTemplate::default());
    }

    #[test]
    fn test_partial_table_template() {
        let settings: Settings =
            serde_json::from_str(r#"{"table_template": {"top": "| a | b |"}}"#).unwrap();
        assert_eq!(settings.table_template.top, "| a | b |");
        assert_eq!(settings.table_template.middle, "|---|---|");
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings {
            max_undo_history: 0,
            max_recent_files: 1000,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.max_undo_history, Settings::MIN_UNDO_HISTORY);
        assert_eq!(settings.max_recent_files, Settings::MAX_RECENT_FILES);

        settings.max_undo_history = 1_000_000;
        settings.max_recent_files = 0;
        settings.sanitize();
        assert_eq!(settings.max_undo_history, Settings::MAX_UNDO_HISTORY);
        assert_eq!(settings.max_recent_files, Settings::DEFAULT_MAX_RECENT_FILES);
    }

    #[test]
    fn test_sanitize_truncates_recent_files() {
        let json = r#"{"max_recent_files": 2, "recent_files": ["a.md", "b.md", "c.md"]}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(
            settings.recent_files,
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")]
        );
    }

    #[test]
    fn test_add_recent_file() {
        let mut settings = Settings {
            max_recent_files: 3,
            ..Settings::default()
        };

        settings.add_recent_file(PathBuf::from("a.md"));
        settings.add_recent_file(PathBuf::from("b.md"));
        settings.add_recent_file(PathBuf::from("a.md"));
        assert_eq!(
            settings.recent_files,
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")]
        );

        settings.add_recent_file(PathBuf::from("c.md"));
        settings.add_recent_file(PathBuf::from("d.md"));
        assert_eq!(settings.recent_files.len(), 3);
        assert_eq!(settings.recent_files[0], PathBuf::from("d.md"));
    }

    #[test]
    fn test_link_falls_back_to_default_url() {
        let settings = Settings {
            default_link_url: "https://example.com".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.link("docs", None),
            MarkdownConstruct::link("docs", "https://example.com")
        );
        assert_eq!(
            settings.image("logo", Some("logo.png".to_string())),
            MarkdownConstruct::image("logo", "logo.png")
        );
    }

    #[test]
    fn test_link_for_selection_reuses_existing_link() {
        let settings = Settings::default();
        assert_eq!(
            settings.link_for_selection("[docs](https://docs.rs)", None, None),
            MarkdownConstruct::link("docs", "https://docs.rs")
        );
        assert_eq!(
            settings.link_for_selection("[docs](https://docs.rs)", None, Some("https://x.io".into())),
            MarkdownConstruct::link("docs", "https://x.io")
        );
        assert_eq!(
            settings.link_for_selection("docs", None, None),
            MarkdownConstruct::link("docs", "https://")
        );
        // An image selection is not reused for a link
        assert_eq!(
            settings.link_for_selection("![a](b)", None, None),
            MarkdownConstruct::link("![a](b)", "https://")
        );
    }

    #[test]
    fn test_image_for_selection_reuses_existing_image() {
        let settings = Settings::default();
        assert_eq!(
            settings.image_for_selection("![logo](/logo.png)", None, None),
            MarkdownConstruct::image("logo", "/logo.png")
        );
        assert_eq!(
            settings.image_for_selection("logo", Some("Logo".into()), Some("a.png".into())),
            MarkdownConstruct::image("Logo", "a.png")
        );
    }

    #[test]
    fn test_wrong_types_fail_to_parse() {
        assert!(Settings::from_json_sanitized(r#"{"max_undo_history": "many"}"#).is_err());
    }
}
