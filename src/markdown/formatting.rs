//! Markdown Formatting Operations
//!
//! The formatting engine behind the editor toolbar. Every function here is a
//! pure transform of `(text, selection)`: nothing is cached between calls and
//! the caller commits the returned text and selection itself.
//!
//! # Operations
//! - [`apply`]: wrap the selection (or a placeholder at the caret) in a construct
//! - [`detect`]: whether a construct is active at the selection
//! - [`clear_construct`]: remove one construct's markup at the selection
//! - [`detect_formatting_state`]: all toolbar highlights at once
//!
//! # Usage
//! ```ignore
//! use mdedit::markdown::{apply, MarkdownConstruct, Selection};
//!
//! let result = apply("hello world", Selection::new(0, 5), &MarkdownConstruct::Bold)?;
//! assert_eq!(result.text, "**hello** world");
//! assert_eq!(result.selection, Selection::caret(9));
//! ```

use crate::error::Result;
use crate::markdown::construct::{ConstructKind, MarkdownConstruct, CODE_FENCE};
use crate::markdown::{EditRecord, Selection};
use crate::string_utils::{
    byte_index_to_char_index, char_index_to_byte_index, char_len, line_bounds, replace_char_range,
};
use log::debug;
use std::borrow::Cow;
use std::ops::Range;

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a mutating formatting call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The new text after formatting
    pub text: String,
    /// Selection to place in the new text
    pub selection: Selection,
    /// The replacement performed, for the undo history
    pub edit: EditRecord,
    /// Whether markup was added (vs removed)
    pub applied: bool,
}

impl FormatResult {
    /// A result that leaves `text` untouched with the caret at `selection`.
    fn unchanged(text: &str, selection: Selection) -> Self {
        Self {
            text: text.to_string(),
            selection,
            edit: EditRecord::new(Selection::caret(selection.start), "", ""),
            applied: false,
        }
    }

    /// Whether the call changed the buffer.
    pub fn changed(&self) -> bool {
        !self.edit.is_noop()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Apply
// ─────────────────────────────────────────────────────────────────────────────

/// Apply a construct to the selection.
///
/// With a caret, the construct's placeholder is inserted as content so the
/// user has visible text to type over. The caret ends up right after the
/// inserted markup.
///
/// # Errors
///
/// Returns `Error::InvalidConstructParameter` for a header level outside 1-6.
pub fn apply(text: &str, selection: Selection, construct: &MarkdownConstruct) -> Result<FormatResult> {
    construct.validate()?;
    let selection = selection.clamp_to(text);
    let selected = selection.slice(text);

    let content: Cow<'_, str> = if selection.is_caret() && selected.is_empty() {
        Cow::Owned(construct.placeholder())
    } else {
        Cow::Borrowed(selected)
    };
    let formatted = construct.render(&content);

    let new_text = if text.is_empty() {
        formatted.clone()
    } else {
        // Covers both caret insertion and replacing a selection
        replace_char_range(text, selection.start, selection.end, &formatted)
    };

    let caret = (selection.start + char_len(&formatted)).min(char_len(&new_text));
    debug!(
        "Applied {} at {}..{}, caret now {}",
        construct.name(),
        selection.start,
        selection.end,
        caret
    );

    Ok(FormatResult {
        text: new_text,
        selection: Selection::caret(caret),
        edit: EditRecord::new(selection, selected, formatted),
        applied: true,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Detect
// ─────────────────────────────────────────────────────────────────────────────

/// Whether `construct` is active at `selection`.
///
/// A non-empty selection is checked on its own boundaries. At a caret,
/// inline constructs look for a balanced marker pair around the caret on
/// its line, line constructs look at the line prefix and code blocks look
/// for enclosing fences. Tables, links and images are never active at a
/// caret.
pub fn detect(text: &str, selection: Selection, construct: &MarkdownConstruct) -> bool {
    if construct.validate().is_err() {
        return false;
    }
    let selection = selection.clamp_to(text);

    if !selection.is_caret() {
        return construct.matches_markup(selection.slice(text));
    }

    let caret = char_index_to_byte_index(text, selection.start);
    match construct.kind() {
        ConstructKind::Inline => find_inline_span(text, caret, construct).is_some(),
        ConstructKind::Line => line_prefix_at(text, caret, construct).is_some(),
        ConstructKind::Block => find_code_block(text, caret).is_some(),
        ConstructKind::Literal => false,
    }
}

/// Formatting state at a selection, for toolbar highlighting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattingState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_strikethrough: bool,
    pub is_code_block: bool,
    /// Current header level (None if not in a header)
    pub header_level: Option<u8>,
    pub is_list_item: bool,
    pub is_numbered_item: bool,
    pub is_checklist: bool,
    pub is_blockquote: bool,
}

/// Detect every toggleable construct at `selection` at once.
pub fn detect_formatting_state(text: &str, selection: Selection) -> FormattingState {
    let active = |construct: &MarkdownConstruct| detect(text, selection, construct);

    FormattingState {
        is_bold: active(&MarkdownConstruct::Bold),
        is_italic: active(&MarkdownConstruct::Italic),
        is_strikethrough: active(&MarkdownConstruct::Strikethrough),
        is_code_block: active(&MarkdownConstruct::CodeBlock),
        header_level: (1..=6).find(|&level| active(&MarkdownConstruct::header(level))),
        is_list_item: active(&MarkdownConstruct::ListItem),
        is_numbered_item: active(&MarkdownConstruct::NumberedItem),
        is_checklist: active(&MarkdownConstruct::Checklist),
        is_blockquote: active(&MarkdownConstruct::Blockquote),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clear a Single Construct
// ─────────────────────────────────────────────────────────────────────────────

/// Remove `construct`'s markup at `selection`.
///
/// A non-empty selection is replaced by the construct's stripped form. At a
/// caret the enclosing marker pair, line prefix or code fences are removed
/// and the caret stays on the same character of content. Text without the
/// markup is left untouched.
pub fn clear_construct(
    text: &str,
    selection: Selection,
    construct: &MarkdownConstruct,
) -> FormatResult {
    let selection = selection.clamp_to(text);

    if !selection.is_caret() {
        let selected = selection.slice(text);
        let stripped = construct.strip(selected);
        let new_text = replace_char_range(text, selection.start, selection.end, &stripped);
        debug!(
            "Stripped {} from {}..{}",
            construct.name(),
            selection.start,
            selection.end
        );
        return FormatResult {
            text: new_text,
            selection: Selection::new(selection.start, selection.start + char_len(&stripped)),
            edit: EditRecord::new(selection, selected, stripped),
            applied: false,
        };
    }

    let caret = char_index_to_byte_index(text, selection.start);
    let removal = match construct.kind() {
        ConstructKind::Inline => find_inline_span(text, caret, construct).map(|span| Removal {
            outer: span.open.start..span.close.end,
            inner: span.open.end..span.close.start,
        }),
        ConstructKind::Line => line_prefix_at(text, caret, construct).map(|prefix| Removal {
            outer: prefix.start..prefix.end,
            inner: prefix.end..prefix.end,
        }),
        ConstructKind::Block => find_code_block(text, caret).map(|block| Removal {
            outer: block.open.start..block.close.end,
            inner: block.open.end..block.close.start,
        }),
        ConstructKind::Literal => None,
    };

    match removal {
        Some(removal) => removal.perform(text, caret, construct),
        None => FormatResult::unchanged(text, selection),
    }
}

/// Byte ranges of markup to remove at a caret: everything in `outer` that
/// is not in `inner` goes away.
struct Removal {
    outer: Range<usize>,
    inner: Range<usize>,
}

impl Removal {
    fn perform(self, text: &str, caret: usize, construct: &MarkdownConstruct) -> FormatResult {
        let before = &text[self.outer.clone()];
        let after = &text[self.inner.clone()];
        let new_text = format!(
            "{}{}{}",
            &text[..self.outer.start],
            after,
            &text[self.outer.end..]
        );

        // Keep the caret on its content character; inside removed markup it
        // snaps to the nearest content edge.
        let opening_len = self.inner.start - self.outer.start;
        let new_caret_byte = if caret <= self.inner.start {
            self.outer.start
        } else if caret <= self.inner.end {
            caret - opening_len
        } else if caret <= self.outer.end {
            self.outer.start + after.len()
        } else {
            caret - (self.outer.len() - self.inner.len())
        };

        let range = Selection::new(
            byte_index_to_char_index(text, self.outer.start),
            byte_index_to_char_index(text, self.outer.end),
        );
        debug!("Removed {} markup around caret", construct.name());

        FormatResult {
            selection: Selection::caret(byte_index_to_char_index(&new_text, new_caret_byte)),
            edit: EditRecord::new(range, before, after),
            text: new_text,
            applied: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Caret Inspection Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Byte ranges of an inline marker pair around the caret.
#[derive(Debug, PartialEq, Eq)]
struct InlineSpan {
    open: Range<usize>,
    close: Range<usize>,
}

/// Runs of `marker` characters in `s` as `(byte_start, run_len)`.
fn marker_runs(s: &str, marker: u8) -> Vec<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == marker {
            let start = i;
            while i < bytes.len() && bytes[i] == marker {
                i += 1;
            }
            runs.push((start, i - start));
        } else {
            i += 1;
        }
    }
    runs
}

/// Whether a run of `len` marker characters can open or close `construct`.
///
/// `*` runs serve both bold and italic: a run of two or more carries bold,
/// an odd-length run carries italic (`***` carries both).
fn run_qualifies(construct: &MarkdownConstruct, len: usize) -> bool {
    match construct {
        MarkdownConstruct::Italic => len % 2 == 1,
        _ => len >= 2,
    }
}

/// Find the balanced marker pair enclosing the caret on its line.
fn find_inline_span(text: &str, caret: usize, construct: &MarkdownConstruct) -> Option<InlineSpan> {
    let marker = construct.inline_marker()?;
    let marker_len = marker.len();
    let marker_byte = marker.as_bytes()[0];

    let (line_start, line_end) = line_bounds(text, caret);
    let before = &text[line_start..caret];
    let after = &text[caret..line_end];

    let openers: Vec<_> = marker_runs(before, marker_byte)
        .into_iter()
        .filter(|&(_, len)| run_qualifies(construct, len))
        .collect();
    if openers.len() % 2 == 0 {
        return None;
    }
    let &(open_start, open_len) = openers.last()?;
    let open_end = line_start + open_start + open_len;

    let &(close_start, _) = marker_runs(after, marker_byte)
        .iter()
        .find(|&&(_, len)| run_qualifies(construct, len))?;
    let close_start = caret + close_start;

    if close_start <= open_end {
        return None;
    }

    Some(InlineSpan {
        open: open_end - marker_len..open_end,
        close: close_start..close_start + marker_len,
    })
}

/// Byte range of `construct`'s prefix if the caret's line starts with it.
fn line_prefix_at(text: &str, caret: usize, construct: &MarkdownConstruct) -> Option<Range<usize>> {
    let prefix = construct.line_prefix()?;
    let (line_start, line_end) = line_bounds(text, caret);
    text[line_start..line_end]
        .starts_with(&prefix)
        .then(|| line_start..line_start + prefix.len())
}

/// Fence lines of a code block enclosing the caret.
///
/// `open` covers the opening fence line with its newline; `close` covers the
/// newline before the closing fence and the fence itself.
#[derive(Debug, PartialEq, Eq)]
struct FenceBlock {
    open: Range<usize>,
    close: Range<usize>,
}

fn find_code_block(text: &str, caret: usize) -> Option<FenceBlock> {
    let mut offset = 0;
    let mut open: Option<Range<usize>> = None;
    let mut caret_line_seen = false;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        let content_end = line_start + line.trim_end_matches(['\n', '\r']).len();
        offset += line.len();

        let is_fence = line.trim_start().starts_with(CODE_FENCE);
        let contains_caret = caret >= line_start && caret <= content_end;

        if is_fence {
            match open.take() {
                None => {
                    if caret_line_seen || contains_caret {
                        // Fences opening at or after the caret cannot enclose it
                        return None;
                    }
                    open = Some(line_start..offset);
                }
                Some(open_line) => {
                    if caret_line_seen {
                        // Line break before the closing fence, CRLF included
                        let mut close_start = line_start.saturating_sub(1);
                        if close_start > 0 && text.as_bytes()[close_start - 1] == b'\r' {
                            close_start -= 1;
                        }
                        let close_start = close_start.max(open_line.end);
                        if text[open_line.end..close_start].trim().is_empty() {
                            return None;
                        }
                        return Some(FenceBlock {
                            open: open_line,
                            close: close_start..content_end,
                        });
                    }
                    if contains_caret {
                        return None;
                    }
                }
            }
        } else if contains_caret && open.is_some() {
            caret_line_seen = true;
        } else if contains_caret {
            return None;
        }
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
