//! Expression buffer: raw text, cursor and entry mode

use alloc::string::{String, ToString};

use crate::mode::EntryMode;
use crate::snapshot::BufferSnapshot;

/// Maximum digits in one numeral (decimal point excluded)
pub const MAX_OPERAND_DIGITS: usize = 15;

/// Representation of an empty buffer
pub const EMPTY_EXPRESSION: &str = "0";

/// Raw expression text with a cursor.
///
/// Invariants:
/// - `text` is never empty; an empty buffer is `"0"` with the cursor at 1
/// - `cursor <= text.chars().count()`
/// - no edit leaves a numeral it touches with more than
///   [`MAX_OPERAND_DIGITS`] digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionBuffer {
    text: String,
    cursor: usize,
    mode: EntryMode,
}

impl ExpressionBuffer {
    pub fn new() -> Self {
        Self {
            text: EMPTY_EXPRESSION.to_string(),
            cursor: 1,
            mode: EntryMode::Insert,
        }
    }

    /// Buffer holding `text` with the cursor at its end
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut buffer = Self::new();
        buffer.replace(text);
        buffer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// True when the buffer is in its reset state
    pub fn is_cleared(&self) -> bool {
        self.text == EMPTY_EXPRESSION
    }

    /// Splice `token` at the cursor.
    ///
    /// A bare `"0"` is dropped before anything but a decimal point. In
    /// overwrite mode the character under the cursor (if any) is replaced.
    /// Returns false, leaving the buffer untouched, when a single digit meets
    /// a numeral already at the digit limit, or when the edit would push a
    /// numeral over it.
    pub fn insert(&mut self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        if is_single_digit(token) && self.numeral_at_cursor() >= MAX_OPERAND_DIGITS {
            return false;
        }

        let elide = self.is_cleared() && token != ".";
        let (base, at) = if elide {
            ("", 0)
        } else {
            (self.text.as_str(), self.cursor)
        };

        let start = byte_index(base, at);
        let end = match self.mode {
            EntryMode::Insert => start,
            EntryMode::Overwrite => byte_index(base, at + 1),
        };

        let mut candidate = String::with_capacity(base.len() + token.len());
        candidate.push_str(&base[..start]);
        candidate.push_str(token);
        candidate.push_str(&base[end..]);

        let token_len = token.chars().count();
        if token.chars().any(|c| c.is_ascii_digit())
            && widest_numeral(&candidate, at, at + token_len) > MAX_OPERAND_DIGITS
        {
            return false;
        }

        self.text = candidate;
        self.cursor = at + token_len;
        true
    }

    /// Digit count of the numeral touching the cursor, before any edit
    fn numeral_at_cursor(&self) -> usize {
        if self.is_cleared() {
            return 0;
        }
        widest_numeral(&self.text, self.cursor.saturating_sub(1), self.cursor + 1)
    }

    /// Remove the character before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        let start = byte_index(&self.text, self.cursor - 1);
        let end = byte_index(&self.text, self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;

        if self.text.is_empty() {
            self.reset();
        }
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Set the cursor, clamped to the buffer
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_len());
    }

    pub fn toggle_mode(&mut self) -> EntryMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn set_mode(&mut self, mode: EntryMode) {
        self.mode = mode;
    }

    /// Back to `"0"` with the cursor at 1. The entry mode is kept.
    pub fn reset(&mut self) {
        self.text.clear();
        self.text.push_str(EMPTY_EXPRESSION);
        self.cursor = 1;
    }

    /// Replace the whole text, cursor at the end
    pub fn replace(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.reset();
            return;
        }
        self.cursor = text.chars().count();
        self.text = text;
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            text: self.text.clone(),
            cursor: self.cursor,
            mode: self.mode,
        }
    }

    pub fn restore(&mut self, snapshot: &BufferSnapshot) {
        self.replace(snapshot.text.clone());
        self.set_cursor(snapshot.cursor);
        self.mode = snapshot.mode;
    }
}

impl Default for ExpressionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Characters that end a numeral
fn is_numeral_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '+' | '-' | '×' | '÷')
}

fn is_single_digit(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_digit())
}

/// Byte index of char position `pos`, or the end of `text`
fn byte_index(text: &str, pos: usize) -> usize {
    text.char_indices()
        .nth(pos)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Largest digit count among the numerals overlapping chars `[from, to)`
fn widest_numeral(text: &str, from: usize, to: usize) -> usize {
    let mut widest = 0;
    let mut run_start = 0;
    let mut digits = 0;

    for (i, ch) in text.chars().chain(core::iter::once(' ')).enumerate() {
        if is_numeral_boundary(ch) {
            // Numeral occupies [run_start, i)
            if run_start < to && i > from {
                widest = widest.max(digits);
            }
            run_start = i + 1;
            digits = 0;
        } else if ch.is_ascii_digit() {
            digits += 1;
        }
    }
    widest
}
