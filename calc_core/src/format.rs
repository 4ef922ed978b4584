//! Group-separator formatting for numerals and expressions

use alloc::string::String;
use alloc::vec::Vec;

/// Character inserted between digit groups in the display string
pub const GROUP_SEPARATOR: char = ',';

/// Piece of a raw expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Anything between operators (numerals, parentheses, exponent results)
    Operand(&'a str),
    /// Operator with its surrounding spaces, e.g. `" × "`
    Operator(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Segment::Operand(s) | Segment::Operator(s) => s,
        }
    }
}

/// Inserts a separator every three digits left of the decimal point.
///
/// The fractional part (everything from the first `.`) is left untouched and
/// a leading minus sign stays attached: `-1234.5678` becomes `-1,234.5678`.
pub fn format_number(numeral: &str) -> String {
    let (integer, fraction) = match numeral.find('.') {
        Some(idx) => numeral.split_at(idx),
        None => (numeral, ""),
    };

    let mut out = group_digits(integer);
    out.push_str(fraction);
    out
}

/// Formats every numeric operand of a raw expression for display.
///
/// Operator tokens pass through; operands already in exponential notation
/// pass through unmodified.
pub fn format_expression(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() + expr.len() / 3);
    for segment in segments(expr) {
        match segment {
            Segment::Operand(part) if is_groupable(part) => out.push_str(&format_number(part)),
            other => out.push_str(other.as_str()),
        }
    }
    out
}

/// Removes every group separator
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|&c| c != GROUP_SEPARATOR).collect()
}

/// Splits a raw expression on whitespace-operator-whitespace triples,
/// keeping the operator tokens.
///
/// Empty operands are kept so that concatenating all segments reproduces the
/// input exactly.
pub fn segments(expr: &str) -> Vec<Segment<'_>> {
    let chars: Vec<(usize, char)> = expr.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map(|&(b, _)| b).unwrap_or(expr.len());

    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + 2 < chars.len() {
        let (a, b, c) = (chars[i].1, chars[i + 1].1, chars[i + 2].1);
        if a.is_whitespace() && is_operator_glyph(b) && c.is_whitespace() {
            out.push(Segment::Operand(&expr[byte_at(start)..byte_at(i)]));
            out.push(Segment::Operator(&expr[byte_at(i)..byte_at(i + 3)]));
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }
    out.push(Segment::Operand(&expr[byte_at(start)..]));
    out
}

/// Operator glyphs as they appear in the raw buffer
pub fn is_operator_glyph(c: char) -> bool {
    matches!(c, '+' | '-' | '×' | '÷')
}

/// True when the operand has a numeric prefix and no exponent marker
fn is_groupable(part: &str) -> bool {
    !part.contains('e') && has_numeric_prefix(part)
}

/// Mirrors a lenient float parse: leading whitespace, an optional sign, then
/// either a digit or a `.` followed by a digit.
fn has_numeric_prefix(part: &str) -> bool {
    let trimmed = part.trim_start();
    let unsigned = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);
    let mut chars = unsigned.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Inserts separators at every non-word-boundary position followed by a
/// digit run whose length is a positive multiple of three.
fn group_digits(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();

    // run[i] = length of the digit run starting at i
    let mut run = alloc::vec![0usize; chars.len() + 1];
    for i in (0..chars.len()).rev() {
        run[i] = if chars[i].is_ascii_digit() { run[i + 1] + 1 } else { 0 };
    }

    let mut out = String::with_capacity(text.len() + chars.len() / 3);
    for (i, &ch) in chars.iter().enumerate() {
        if i > 0 {
            let non_boundary = is_word_char(chars[i - 1]) == is_word_char(ch);
            if non_boundary && run[i] > 0 && run[i] % 3 == 0 {
                out.push(GROUP_SEPARATOR);
            }
        }
        out.push(ch);
    }
    out
}
