//! Platform-independent key representation

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

const DIGIT_TEXT: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Binary operator key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Glyph used in the raw buffer
    pub fn glyph(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Token inserted into the buffer, operator surrounded by single spaces
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Add => " + ",
            Operator::Subtract => " - ",
            Operator::Multiply => " × ",
            Operator::Divide => " ÷ ",
        }
    }

    /// Accepts both display glyphs and ASCII spellings
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '×' | '*' | 'x' => Some(Operator::Multiply),
            '÷' | '/' => Some(Operator::Divide),
            _ => None,
        }
    }
}

/// Memory register key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum MemoryKey {
    /// MC
    Clear,
    /// MR
    Recall,
    /// M+
    Add,
    /// M-
    Subtract,
}

impl MemoryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKey::Clear => "MC",
            MemoryKey::Recall => "MR",
            MemoryKey::Add => "M+",
            MemoryKey::Subtract => "M-",
        }
    }
}

/// Discrete command from the UI shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum CalcKey {
    // Entry
    Digit(u8),
    Decimal,
    Operator(Operator),
    OpenParen,
    CloseParen,
    /// Recall last answer
    Answer,

    // Actions
    Evaluate,
    Backspace,
    ClearAll,
    ToggleInsert,
    Memory(MemoryKey),

    // Navigation (scrolls the result viewer while a result is shown)
    Left,
    Right,
}

impl CalcKey {
    /// Convert ASCII byte to key (for console input)
    pub fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'0'..=b'9' => Some(CalcKey::Digit(byte - b'0')),
            b'.' => Some(CalcKey::Decimal),
            b'(' => Some(CalcKey::OpenParen),
            b')' => Some(CalcKey::CloseParen),
            b'=' | b'\r' | b'\n' => Some(CalcKey::Evaluate),
            0x08 | 0x7F => Some(CalcKey::Backspace),
            0x1B => Some(CalcKey::ClearAll),
            b'i' => Some(CalcKey::ToggleInsert),
            b'a' => Some(CalcKey::Answer),
            b'<' => Some(CalcKey::Left),
            b'>' => Some(CalcKey::Right),
            b'+' | b'-' | b'*' | b'x' | b'/' => {
                Operator::from_char(byte as char).map(CalcKey::Operator)
            }
            _ => None,
        }
    }

    /// Text this key splices into the buffer, if it is a plain entry key.
    ///
    /// `Answer` is resolved by the caller since it depends on session state.
    pub fn insertion_text(&self) -> Option<&'static str> {
        match self {
            CalcKey::Digit(d) => DIGIT_TEXT.get(usize::from(*d)).copied(),
            CalcKey::Decimal => Some("."),
            CalcKey::Operator(op) => Some(op.token()),
            CalcKey::OpenParen => Some("("),
            CalcKey::CloseParen => Some(")"),
            _ => None,
        }
    }
}
