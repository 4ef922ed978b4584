//! Cursor translation between the raw buffer and the formatted display string
//!
//! Offsets are counted in `char`s on both sides. Separators are the only
//! characters that differ between the two strings, so a position is carried
//! across by counting the non-separator characters in front of it.

use alloc::string::String;

use crate::format::{format_expression, GROUP_SEPARATOR};

/// Formatted display string together with the mapped cursor.
///
/// Derived from the raw buffer on every render, never cached across edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedView {
    pub text: String,
    pub cursor: usize,
}

impl FormattedView {
    pub fn derive(raw: &str, raw_cursor: usize) -> Self {
        let text = format_expression(raw);
        let cursor = display_offset(raw, raw_cursor, &text);
        Self { text, cursor }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Maps a raw cursor offset to an offset in the formatted string.
///
/// The result points one past the N-th non-separator character of
/// `formatted`, where N is the number of non-separator characters in front of
/// `raw_cursor`. Snaps to the end when `formatted` runs out.
pub fn display_offset(raw: &str, raw_cursor: usize, formatted: &str) -> usize {
    let wanted = count_significant(raw, raw_cursor);
    offset_after(formatted, wanted)
}

/// Maps a display offset back to an offset in the raw buffer.
pub fn raw_offset(formatted: &str, display_cursor: usize, raw: &str) -> usize {
    let wanted = count_significant(formatted, display_cursor);
    offset_after(raw, wanted)
}

/// Non-separator characters among the first `upto` chars of `text`
fn count_significant(text: &str, upto: usize) -> usize {
    text.chars()
        .take(upto)
        .filter(|&c| c != GROUP_SEPARATOR)
        .count()
}

/// Index one past the `n`-th non-separator char, or the end of `text`
fn offset_after(text: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }

    let mut seen = 0;
    for (i, ch) in text.chars().enumerate() {
        if ch != GROUP_SEPARATOR {
            seen += 1;
            if seen == n {
                return i + 1;
            }
        }
    }
    text.chars().count()
}
