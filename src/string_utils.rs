//! UTF-8 Safe String Utilities
//!
//! Selections are expressed in character (Unicode scalar) offsets, while Rust
//! strings are sliced by byte. These helpers convert between the two and
//! perform the slicing and splicing the formatting engine needs without ever
//! landing inside a multi-byte character.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{char_slice, replace_char_range};
//!
//! let text = "Hei på deg";
//! assert_eq!(char_slice(text, 4, 6), "på");
//! assert_eq!(replace_char_range(text, 4, 6, "**på**"), "Hei **på** deg");
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Convert a character index to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index.
///
/// If the byte index is in the middle of a character, it counts
/// up to (but not including) that character.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Char-Range Slicing and Splicing
// ─────────────────────────────────────────────────────────────────────────────

/// Slice `s` by character offsets `[start, end)`.
///
/// Offsets past the end are clamped; a reversed range yields `""`.
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start = char_index_to_byte_index(s, start);
    let end = char_index_to_byte_index(s, end);
    if start >= end {
        return "";
    }
    &s[start..end]
}

/// Return a copy of `s` with the characters in `[start, end)` replaced by
/// `replacement`.
pub fn replace_char_range(s: &str, start: usize, end: usize, replacement: &str) -> String {
    let start = char_index_to_byte_index(s, start);
    let end = char_index_to_byte_index(s, end).max(start);

    let mut out = String::with_capacity(s.len() - (end - start) + replacement.len());
    out.push_str(&s[..start]);
    out.push_str(replacement);
    out.push_str(&s[end..]);
    out
}

/// Byte bounds `(start, end)` of the line containing byte offset `index`.
///
/// `end` points at the terminating `\n` (or the end of the string); the
/// newline itself is not part of the line.
pub fn line_bounds(s: &str, index: usize) -> (usize, usize) {
    let index = floor_char_boundary(s, index);
    let start = s[..index].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = s[index..].find('\n').map(|i| index + i).unwrap_or(s.len());
    (start, end)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
