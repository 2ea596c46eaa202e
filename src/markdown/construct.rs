//! Markdown constructs
//!
//! [`MarkdownConstruct`] is the closed set of markup the editor can insert,
//! recognise and remove. Each variant knows how to render itself around a
//! piece of text, what placeholder to insert when nothing is selected, and
//! how to strip its own markup again.
//!
//! # Markup Patterns
//! - **Inline**: Bold `**x**`, Italic `*x*`, Strikethrough `~~x~~`
//! - **Line**: Header `## x`, List `- x`, Numbered `1. x`, Checklist `- [ ] x`, Blockquote `> x`
//! - **Block**: Code block (fenced with three backticks)
//! - **Literal**: Table, Link `[name](url)`, Image `![name](url)`

use crate::error::{Error, Result};
use crate::markdown::clear::strip_markup;
use regex::Regex;
use std::sync::OnceLock;

/// Opening and closing fence of a code block.
pub const CODE_FENCE: &str = "```";

/// Lowest and highest header levels markdown supports.
pub const MIN_HEADER_LEVEL: u8 = 1;
pub const MAX_HEADER_LEVEL: u8 = 6;

/// Top, middle and bottom rows of the default two-column table.
pub const DEFAULT_TABLE_ROWS: [&str; 3] = ["|   |   |", "|---|---|", "|   |   |"];

// ─────────────────────────────────────────────────────────────────────────────
// Construct Enum
// ─────────────────────────────────────────────────────────────────────────────

/// A markdown formatting construct that can be applied to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkdownConstruct {
    /// Bold text (**text**)
    Bold,
    /// Italic text (*text*)
    Italic,
    /// Strikethrough (~~text~~)
    Strikethrough,
    /// Header level 1-6
    Header { level: u8 },
    /// Bullet list item (- text)
    ListItem,
    /// Numbered list item (1. text)
    NumberedItem,
    /// Task list item (- [ ] text)
    Checklist,
    /// Blockquote (> text)
    Blockquote,
    /// Fenced code block
    CodeBlock,
    /// Table made of three literal rows
    Table {
        top: String,
        middle: String,
        bottom: String,
    },
    /// Link ([name](url))
    Link { name: String, url: String },
    /// Image (![name](url))
    Image { name: String, url: String },
}

/// How a construct attaches to the text it formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    /// Balanced markers around a span on one line
    Inline,
    /// A prefix at the start of a line
    Line,
    /// Fence lines around a block
    Block,
    /// Fully rendered from its payload and compared literally
    Literal,
}

impl MarkdownConstruct {
    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    /// Header of the given level.
    pub fn header(level: u8) -> Self {
        Self::Header { level }
    }

    /// The default two-column table template.
    pub fn table() -> Self {
        let [top, middle, bottom] = DEFAULT_TABLE_ROWS;
        Self::Table {
            top: top.to_string(),
            middle: middle.to_string(),
            bottom: bottom.to_string(),
        }
    }

    /// Link with display name and target.
    pub fn link(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Link {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Image with alt text and source.
    pub fn image(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Image {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Parse `text` as a complete link (`[name](url)`) or image (`![name](url)`).
    pub fn parse_link(text: &str) -> Option<Self> {
        static LINK: OnceLock<Regex> = OnceLock::new();
        let pattern = LINK.get_or_init(|| {
            Regex::new(r"^(!?)\[([^\]\n]*)\]\(([^()\s]*)\)$")
                .unwrap_or_else(|e| panic!("invalid link pattern: {e}"))
        });
        let caps = pattern.captures(text)?;
        let (name, url) = (&caps[2], &caps[3]);
        if caps[1].is_empty() {
            Some(Self::link(name, url))
        } else {
            Some(Self::image(name, url))
        }
    }

    /// Constructs shown on the formatting toolbar, in display order.
    pub fn toolbar() -> Vec<Self> {
        vec![
            Self::Bold,
            Self::Italic,
            Self::Strikethrough,
            Self::header(1),
            Self::header(2),
            Self::header(3),
            Self::ListItem,
            Self::NumberedItem,
            Self::Checklist,
            Self::Blockquote,
            Self::CodeBlock,
            Self::table(),
            Self::link("", ""),
            Self::image("", ""),
        ]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Classification and Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// How this construct attaches to text.
    pub fn kind(&self) -> ConstructKind {
        match self {
            Self::Bold | Self::Italic | Self::Strikethrough => ConstructKind::Inline,
            Self::Header { .. }
            | Self::ListItem
            | Self::NumberedItem
            | Self::Checklist
            | Self::Blockquote => ConstructKind::Line,
            Self::CodeBlock => ConstructKind::Block,
            Self::Table { .. } | Self::Link { .. } | Self::Image { .. } => ConstructKind::Literal,
        }
    }

    /// Reject parameters markdown cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConstructParameter` for a header level outside 1-6.
    pub fn validate(&self) -> Result<()> {
        if let Self::Header { level } = self {
            if !(MIN_HEADER_LEVEL..=MAX_HEADER_LEVEL).contains(level) {
                return Err(Error::InvalidConstructParameter {
                    message: format!(
                        "header level {} is outside {}-{}",
                        level, MIN_HEADER_LEVEL, MAX_HEADER_LEVEL
                    ),
                });
            }
        }
        Ok(())
    }

    /// Marker placed on both sides of an inline span.
    pub fn inline_marker(&self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("**"),
            Self::Italic => Some("*"),
            Self::Strikethrough => Some("~~"),
            _ => None,
        }
    }

    /// Literal prefix for line constructs (`"### "` for a level 3 header).
    pub fn line_prefix(&self) -> Option<String> {
        match self {
            Self::Header { level } => Some(format!("{} ", "#".repeat(*level as usize))),
            Self::ListItem => Some("- ".to_string()),
            Self::NumberedItem => Some("1. ".to_string()),
            Self::Checklist => Some("- [ ] ".to_string()),
            Self::Blockquote => Some("> ".to_string()),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Wrap `text` in this construct's markup.
    ///
    /// Tables, links and images render from their payload alone.
    pub fn render(&self, text: &str) -> String {
        match self {
            Self::Bold | Self::Italic | Self::Strikethrough => {
                let marker = self.inline_marker().unwrap_or_default();
                format!("{marker}{text}{marker}")
            }
            Self::Header { .. }
            | Self::ListItem
            | Self::NumberedItem
            | Self::Checklist
            | Self::Blockquote => {
                format!("{}{}", self.line_prefix().unwrap_or_default(), text)
            }
            Self::CodeBlock => format!("{CODE_FENCE}\n{text}\n{CODE_FENCE}"),
            Self::Table {
                top,
                middle,
                bottom,
            } => format!("{top}\n{middle}\n{bottom}"),
            Self::Link { name, url } => format!("[{name}]({url})"),
            Self::Image { name, url } => format!("![{name}]({url})"),
        }
    }

    /// Descriptive text inserted when the construct is applied at a caret.
    pub fn placeholder(&self) -> String {
        match self {
            Self::Header { level } => format!("Header {}", level),
            Self::Link { url, .. } => format!("Link to {}", url),
            Self::Image { url, .. } => format!("Image from {}", url),
            _ => self.name().to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Recognition and Stripping
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether `text` as a whole carries this construct's markup.
    pub fn matches_markup(&self, text: &str) -> bool {
        match self.kind() {
            ConstructKind::Inline => {
                let marker = self.inline_marker().unwrap_or_default();
                let wrapped = text.len() >= marker.len() * 2
                    && text.starts_with(marker)
                    && text.ends_with(marker);
                match self {
                    // An even `*` run is bold, not italic
                    Self::Italic => {
                        let leading = text.len() - text.trim_start_matches('*').len();
                        let trailing = text.len() - text.trim_end_matches('*').len();
                        wrapped && leading % 2 == 1 && trailing % 2 == 1
                    }
                    _ => wrapped,
                }
            }
            ConstructKind::Line => self
                .line_prefix()
                .is_some_and(|prefix| text.starts_with(&prefix)),
            ConstructKind::Block => {
                text.len() >= CODE_FENCE.len() * 2
                    && text.starts_with(CODE_FENCE)
                    && text.ends_with(CODE_FENCE)
            }
            ConstructKind::Literal => text == self.render(""),
        }
    }

    /// Remove this construct's markup from `text`.
    ///
    /// Text that does not carry the markup is returned unchanged.
    pub fn strip(&self, text: &str) -> String {
        if !self.matches_markup(text) {
            return text.to_string();
        }

        match self {
            Self::Bold | Self::Italic | Self::Strikethrough => {
                let marker = self.inline_marker().unwrap_or_default();
                text[marker.len()..text.len() - marker.len()].to_string()
            }
            Self::Header { .. }
            | Self::ListItem
            | Self::NumberedItem
            | Self::Checklist
            | Self::Blockquote => {
                let prefix = self.line_prefix().unwrap_or_default();
                text[prefix.len()..].to_string()
            }
            Self::CodeBlock => {
                let inner = &text[CODE_FENCE.len()..text.len() - CODE_FENCE.len()];
                match inner.find('\n') {
                    // Drop the (possibly empty) info string line
                    Some(newline) => {
                        let body = &inner[newline + 1..];
                        body.strip_suffix('\n').unwrap_or(body).to_string()
                    }
                    None => inner.to_string(),
                }
            }
            Self::Table { .. } => strip_markup(text),
            Self::Link { url, .. } | Self::Image { url, .. } => url.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toolbar Metadata
    // ─────────────────────────────────────────────────────────────────────────

    /// Human-readable name of the construct.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::Header { .. } => "Header",
            Self::ListItem => "List Item",
            Self::NumberedItem => "Numbered Item",
            Self::Checklist => "Checklist",
            Self::Blockquote => "Blockquote",
            Self::CodeBlock => "Code Block",
            Self::Table { .. } => "Table",
            Self::Link { .. } => "Link",
            Self::Image { .. } => "Image",
        }
    }

    /// Get the keyboard shortcut label for this construct.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Strikethrough => "Ctrl+Shift+S",
            Self::Header { level: 1 } => "Ctrl+1",
            Self::Header { level: 2 } => "Ctrl+2",
            Self::Header { level: 3 } => "Ctrl+3",
            Self::Header { level: 4 } => "Ctrl+4",
            Self::Header { level: 5 } => "Ctrl+5",
            Self::Header { level: 6 } => "Ctrl+6",
            Self::Header { .. } => "Ctrl+1-6",
            Self::ListItem => "Ctrl+Shift+B",
            Self::NumberedItem => "Ctrl+Shift+N",
            Self::Checklist => "Ctrl+Shift+X",
            Self::Blockquote => "Ctrl+Q",
            Self::CodeBlock => "Ctrl+Shift+C",
            Self::Table { .. } => "Ctrl+Shift+T",
            Self::Link { .. } => "Ctrl+K",
            Self::Image { .. } => "Ctrl+Shift+K",
        }
    }

    /// Get the tooltip text for this construct.
    pub fn tooltip(&self) -> String {
        match self {
            Self::Header { level } => format!("Header {} ({})", level, self.shortcut_label()),
            _ => format!("{} ({})", self.name(), self.shortcut_label()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inline() {
        assert_eq!(MarkdownConstruct::Bold.render("x"), "**x**");
        assert_eq!(MarkdownConstruct::Italic.render("x"), "*x*");
        assert_eq!(MarkdownConstruct::Strikethrough.render("x"), "~~x~~");
    }

    #[test]
    fn test_render_line_prefixes() {
        assert_eq!(MarkdownConstruct::header(3).render("text"), "### text");
        assert_eq!(MarkdownConstruct::ListItem.render("a"), "- a");
        assert_eq!(MarkdownConstruct::NumberedItem.render("a"), "1. a");
        assert_eq!(MarkdownConstruct::Checklist.render("a"), "- [ ] a");
        assert_eq!(MarkdownConstruct::Blockquote.render("a"), "> a");
    }

    #[test]
    fn test_render_code_block() {
        assert_eq!(
            MarkdownConstruct::CodeBlock.render("let x = 1;"),
            "```\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_render_literals_ignore_text() {
        assert_eq!(
            MarkdownConstruct::table().render("ignored"),
            "|   |   |\n|---|---|\n|   |   |"
        );
        assert_eq!(
            MarkdownConstruct::link("docs", "https://x.io").render("ignored"),
            "[docs](https://x.io)"
        );
        assert_eq!(
            MarkdownConstruct::image("logo", "/logo.png").render(""),
            "![logo](/logo.png)"
        );
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(MarkdownConstruct::Bold.placeholder(), "Bold");
        assert_eq!(MarkdownConstruct::header(2).placeholder(), "Header 2");
        assert_eq!(MarkdownConstruct::CodeBlock.placeholder(), "Code Block");
        assert_eq!(
            MarkdownConstruct::link("x", "https://a.b").placeholder(),
            "Link to https://a.b"
        );
        assert_eq!(
            MarkdownConstruct::image("x", "/a.png").placeholder(),
            "Image from /a.png"
        );
    }

    #[test]
    fn test_validate_header_levels() {
        for level in 1..=6 {
            assert!(MarkdownConstruct::header(level).validate().is_ok());
        }
        assert!(matches!(
            MarkdownConstruct::header(0).validate(),
            Err(Error::InvalidConstructParameter { .. })
        ));
        assert!(MarkdownConstruct::header(7).validate().is_err());
        assert!(MarkdownConstruct::Bold.validate().is_ok());
    }

    #[test]
    fn test_matches_markup_requires_room_for_both_markers() {
        assert!(MarkdownConstruct::Bold.matches_markup("**a**"));
        assert!(MarkdownConstruct::Bold.matches_markup("****"));
        assert!(!MarkdownConstruct::Bold.matches_markup("**"));
        assert!(!MarkdownConstruct::Bold.matches_markup("**a"));
        assert!(!MarkdownConstruct::Italic.matches_markup("*"));
    }

    #[test]
    fn test_matches_markup_italic_needs_odd_star_runs() {
        assert!(MarkdownConstruct::Italic.matches_markup("*a*"));
        assert!(MarkdownConstruct::Italic.matches_markup("***a***"));
        assert!(!MarkdownConstruct::Italic.matches_markup("**bold**"));
        assert!(!MarkdownConstruct::Italic.matches_markup("*a**"));
        assert_eq!(MarkdownConstruct::Italic.strip("**bold**"), "**bold**");
    }

    #[test]
    fn test_matches_markup_header_level_is_exact() {
        assert!(MarkdownConstruct::header(2).matches_markup("## Title"));
        assert!(!MarkdownConstruct::header(2).matches_markup("### Title"));
        assert!(!MarkdownConstruct::header(2).matches_markup("# Title"));
    }

    #[test]
    fn test_strip_inline_and_line() {
        assert_eq!(MarkdownConstruct::Bold.strip("**hi**"), "hi");
        assert_eq!(MarkdownConstruct::Strikethrough.strip("~~no~~"), "no");
        assert_eq!(MarkdownConstruct::Checklist.strip("- [ ] milk"), "milk");
        assert_eq!(MarkdownConstruct::header(1).strip("# Top"), "Top");
        assert_eq!(MarkdownConstruct::Bold.strip("plain"), "plain");
    }

    #[test]
    fn test_strip_code_block_drops_info_string() {
        assert_eq!(MarkdownConstruct::CodeBlock.strip("```\ncode\n```"), "code");
        assert_eq!(MarkdownConstruct::CodeBlock.strip("```rust\nfn f() {}\n```"), "fn f() {}");
        assert_eq!(MarkdownConstruct::CodeBlock.strip("```inline```"), "inline");
    }

    #[test]
    fn test_strip_literals() {
        let link = MarkdownConstruct::link("a", "https://a.b");
        assert_eq!(link.strip("[a](https://a.b)"), "https://a.b");
        assert_eq!(link.strip("[b](https://a.b)"), "[b](https://a.b)");
        let table = MarkdownConstruct::table();
        assert_eq!(table.strip(&table.render("")), "      \n      ");
    }

    #[test]
    fn test_parse_link() {
        assert_eq!(
            MarkdownConstruct::parse_link("[docs](https://docs.rs)"),
            Some(MarkdownConstruct::link("docs", "https://docs.rs"))
        );
        assert_eq!(
            MarkdownConstruct::parse_link("![logo](/logo.png)"),
            Some(MarkdownConstruct::image("logo", "/logo.png"))
        );
        assert_eq!(
            MarkdownConstruct::parse_link("[]()"),
            Some(MarkdownConstruct::link("", ""))
        );
        assert_eq!(MarkdownConstruct::parse_link("see [a](b)"), None);
        assert_eq!(MarkdownConstruct::parse_link("[a](b) and [c](d)"), None);
        assert_eq!(MarkdownConstruct::parse_link("plain"), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(MarkdownConstruct::Italic.kind(), ConstructKind::Inline);
        assert_eq!(MarkdownConstruct::Blockquote.kind(), ConstructKind::Line);
        assert_eq!(MarkdownConstruct::CodeBlock.kind(), ConstructKind::Block);
        assert_eq!(MarkdownConstruct::table().kind(), ConstructKind::Literal);
    }

    #[test]
    fn test_shortcut_labels() {
        assert_eq!(MarkdownConstruct::Bold.shortcut_label(), "Ctrl+B");
        assert_eq!(MarkdownConstruct::header(4).shortcut_label(), "Ctrl+4");
        assert_eq!(MarkdownConstruct::header(9).shortcut_label(), "Ctrl+1-6");
        assert_eq!(MarkdownConstruct::link("", "").shortcut_label(), "Ctrl+K");
    }

    #[test]
    fn test_tooltips() {
        let tooltip = MarkdownConstruct::Bold.tooltip();
        assert!(tooltip.contains("Bold"));
        assert!(tooltip.contains("Ctrl+B"));
        assert_eq!(MarkdownConstruct::header(2).tooltip(), "Header 2 (Ctrl+2)");
    }

    #[test]
    fn test_toolbar_order() {
        let toolbar = MarkdownConstruct::toolbar();
        assert_eq!(toolbar.first(), Some(&MarkdownConstruct::Bold));
        assert_eq!(toolbar.len(), 14);
        assert!(toolbar.iter().all(|c| c.validate().is_ok()));
    }
}
