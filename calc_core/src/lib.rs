#![no_std]

//! # Calculator Core
//!
//! Editing, formatting and evaluation logic for the calculator display.
//!
//! ## Philosophy
//!
//! - **No_std compatible**: Uses alloc but not std
//! - **Deterministic**: Same key trace => same buffer state
//! - **Text-editor semantics**: Cursor, insert/overwrite, backspace
//! - **Raw vs. display**: The buffer holds raw text; separators exist only in
//!   the formatted view and are re-derived on every render
//! - **No eval**: Expressions go through an explicit arithmetic parser
//!
//! ## Design
//!
//! The core provides:
//! - ExpressionBuffer: raw text, cursor and entry mode
//! - format: group separators for numerals and whole expressions
//! - cursor_map: raw cursor <-> display cursor translation
//! - Evaluator: constrained arithmetic grammar and result normalisation
//! - CalcKey: platform-independent key surface

extern crate alloc;

pub mod buffer;
pub mod cursor_map;
pub mod eval;
pub mod format;
pub mod key;
pub mod mode;
pub mod snapshot;

pub use buffer::{ExpressionBuffer, EMPTY_EXPRESSION, MAX_OPERAND_DIGITS};
pub use cursor_map::{display_offset, raw_offset, FormattedView};
pub use eval::{EvalError, EvalResult, Evaluation, Evaluator};
pub use format::{format_expression, format_number, strip_separators, GROUP_SEPARATOR};
pub use key::{CalcKey, MemoryKey, Operator};
pub use mode::EntryMode;
pub use snapshot::BufferSnapshot;
