//! Clearing markdown markup
//!
//! [`clear_selection`] strips every recognised construct from a selection
//! (or the whole buffer when nothing is selected). Rules run in a fixed
//! order so mixed input always clears the same way:
//!
//! 1. Inline bold, italic and strikethrough, repeated until nothing changes
//! 2. Header markers
//! 3. Checklist, numbered and bullet prefixes (checklist first)
//! 4. Blockquote markers
//! 5. Code fences (content kept)
//! 6. Images, then links (both reduced to their URL)
//! 7. Table pipes
//! 8. Horizontal rule lines

use crate::markdown::formatting::FormatResult;
use crate::markdown::{EditRecord, Selection};
use crate::string_utils::{char_len, replace_char_range};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// A single pattern/replacement pair.
struct ClearRule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl ClearRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            // Patterns are fixed literals covered by tests
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid {name} rule: {e}")),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

struct ClearRules {
    inline: Vec<ClearRule>,
    structural: Vec<ClearRule>,
}

fn rules() -> &'static ClearRules {
    static RULES: OnceLock<ClearRules> = OnceLock::new();
    RULES.get_or_init(|| ClearRules {
        inline: vec![
            ClearRule::new("bold", r"\*\*(.*?)\*\*", "${1}"),
            ClearRule::new("italic", r"\*(.*?)\*", "${1}"),
            ClearRule::new("strikethrough", r"~~(.*?)~~", "${1}"),
        ],
        structural: vec![
            ClearRule::new("header", r"(?m)^#{1,6} ?", ""),
            ClearRule::new("checklist", r"(?m)^- \[[ xX]\] ", ""),
            ClearRule::new("numbered", r"(?m)^\d+\.[ \t]+", ""),
            ClearRule::new("bullet", r"(?m)^[-*+][ \t]+", ""),
            ClearRule::new("blockquote", r"(?m)^> ?", ""),
            ClearRule::new("code fence", r"```(?:[^\n`]*\n)?((?s:.*?))\n?```", "${1}"),
            ClearRule::new("image", r"!\[(.*?)\]\((.*?)\)", "${2}"),
            ClearRule::new("link", r"\[(.*?)\]\((.*?)\)", "${2}"),
            ClearRule::new("table", r"\|", ""),
            ClearRule::new(
                "horizontal rule",
                r"(?m)^[ \t]*[-*_]{3,}[ \t]*(?:\r?\n|\z)",
                "",
            ),
        ],
    })
}

/// Strip all recognised markdown markup from `text`.
pub fn strip_markup(text: &str) -> String {
    let rules = rules();
    let mut out = text.to_string();

    // Each successful pass removes at least two marker characters,
    // so this terminates.
    loop {
        let next = rules
            .inline
            .iter()
            .fold(out.clone(), |acc, rule| rule.apply(&acc));
        if next == out {
            break;
        }
        out = next;
    }

    for rule in &rules.structural {
        let next = rule.apply(&out);
        if next != out {
            debug!("Cleared {} markup", rule.name);
        }
        out = next;
    }
    out
}

/// Strip all markup inside `selection`, or the whole buffer for a caret.
///
/// The returned selection covers the cleared text.
pub fn clear_selection(text: &str, selection: Selection) -> FormatResult {
    let selection = selection.clamp_to(text);
    let range = if selection.is_caret() {
        Selection::all(text)
    } else {
        selection
    };

    let before = range.slice(text);
    let cleared = strip_markup(before);
    let new_text = replace_char_range(text, range.start, range.end, &cleared);
    let new_selection = Selection::new(range.start, range.start + char_len(&cleared));

    debug!(
        "Cleared markup in {}..{} ({} -> {} chars)",
        range.start,
        range.end,
        range.len(),
        new_selection.len()
    );

    FormatResult {
        text: new_text,
        selection: new_selection,
        edit: EditRecord::new(range, before, cleared),
        applied: false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Rule Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_strip_inline_styles() {
        assert_eq!(strip_markup("**bold** and *it* and ~~gone~~"), "bold and it and gone");
    }

    #[test]
    fn test_strip_nested_inline_reaches_fixpoint() {
        assert_eq!(strip_markup("***both***"), "both");
        assert_eq!(strip_markup("**bold *italic* bold**"), "bold italic bold");
        assert_eq!(strip_markup("~~**struck bold**~~"), "struck bold");
    }

    #[test]
    fn test_strip_headers_per_line() {
        assert_eq!(strip_markup("# One\n### Three\nplain"), "One\nThree\nplain");
    }

    #[test]
    fn test_checklist_is_not_stripped_as_bullet() {
        assert_eq!(strip_markup("- [ ] buy milk"), "buy milk");
        assert_eq!(strip_markup("- [x] done"), "done");
    }

    #[test]
    fn test_strip_list_prefixes() {
        assert_eq!(strip_markup("- a\n+ b\n12. c"), "a\nb\nc");
    }

    #[test]
    fn test_strip_blockquote() {
        assert_eq!(strip_markup("> quoted\n>\n> more"), "quoted\n\nmore");
    }

    #[test]
    fn test_strip_code_fences_keeps_content() {
        assert_eq!(strip_markup("```\nlet x = 1;\n```"), "let x = 1;");
        assert_eq!(strip_markup("```rust\nfn f() {}\n```\nafter"), "fn f() {}\nafter");
        assert_eq!(strip_markup("```inline```"), "inline");
    }

    #[test]
    fn test_images_before_links() {
        assert_eq!(strip_markup("![logo](/logo.png)"), "/logo.png");
        assert_eq!(strip_markup("[docs](https://a.b)"), "https://a.b");
        assert_eq!(
            strip_markup("see ![i](/i.png) and [l](https://l.io)"),
            "see /i.png and https://l.io"
        );
    }

    #[test]
    fn test_strip_table_and_separator() {
        assert_eq!(
            strip_markup("| a | b |\n|---|---|\n| 1 | 2 |"),
            " a  b \n 1  2 "
        );
    }

    #[test]
    fn test_strip_horizontal_rules() {
        assert_eq!(strip_markup("above\n---\nbelow"), "above\nbelow");
        assert_eq!(strip_markup("above\n  ___  \nbelow"), "above\nbelow");
        assert_eq!(strip_markup("a -- b"), "a -- b");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Nothing to see here, 2 + 2 = 4.";
        assert_eq!(strip_markup(text), text);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // clear_selection Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_clear_selection_only_touches_range() {
        let text = "**a** **b**";
        let result = clear_selection(text, Selection::new(6, 11));
        assert_eq!(result.text, "**a** b");
        assert_eq!(result.selection, Selection::new(6, 7));
        assert_eq!(result.edit.before, "**b**");
        assert_eq!(result.edit.after, "b");
        assert!(!result.applied);
    }

    #[test]
    fn test_clear_caret_clears_whole_buffer() {
        let text = "# Title\n- item\n**bold**";
        let result = clear_selection(text, Selection::caret(0));
        assert_eq!(result.text, "Title\nitem\nbold");
        assert_eq!(result.edit.range, Selection::all(text));
        assert_eq!(result.edit.revert(&result.text), text);
    }

    #[test]
    fn test_clear_empty_buffer() {
        let result = clear_selection("", Selection::caret(0));
        assert_eq!(result.text, "");
        assert!(result.edit.is_noop());
    }

    #[test]
    fn test_clear_multibyte_selection() {
        let text = "Hei **på** deg";
        let result = clear_selection(text, Selection::new(4, 10));
        assert_eq!(result.text, "Hei på deg");
        assert_eq!(result.selection, Selection::new(4, 6));
    }
}
