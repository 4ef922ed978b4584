//! Arithmetic evaluation and result normalisation
//!
//! Grammar (after separators are stripped and `×`/`÷` become `*`/`/`):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! number  := digits ['.' digits] [exponent] | '.' digits [exponent]
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::format::GROUP_SEPARATOR;

/// Results with more significant characters than this use exponential form
const MAX_PLAIN_DIGITS: usize = 15;
/// Magnitudes above this use exponential form
const MAX_PLAIN_MAGNITUDE: f64 = 1e15;
/// Non-zero magnitudes below this use exponential form
const MIN_PLAIN_MAGNITUDE: f64 = 1e-9;
/// Fraction digits in exponential form
const EXPONENT_FRACTION_DIGITS: usize = 9;
/// Deepest nesting of parentheses and unary signs the parser descends into
const MAX_NESTING: usize = 256;

/// Evaluation failure. Every variant is an invalid expression to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A character outside `[0-9.+\-*/()\s]` (plus exponent markers)
    InvalidCharacter(char),
    /// Token in a position the grammar does not allow
    UnexpectedToken { position: usize },
    /// Input ended in the middle of an expression
    UnexpectedEnd,
    /// Numeric literal that does not parse, e.g. `1.2.3` or `5e`
    MalformedNumber(String),
    /// Division by zero or overflow
    NonFinite,
    /// Nothing to evaluate
    Empty,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::InvalidCharacter(c) => write!(f, "Invalid character: {:?}", c),
            EvalError::UnexpectedToken { position } => {
                write!(f, "Unexpected token at position {}", position)
            }
            EvalError::UnexpectedEnd => write!(f, "Unexpected end of expression"),
            EvalError::MalformedNumber(s) => write!(f, "Malformed number: {}", s),
            EvalError::NonFinite => write!(f, "Result is not a finite number"),
            EvalError::Empty => write!(f, "Empty expression"),
        }
    }
}

impl core::error::Error for EvalError {}

/// Evaluation result
pub type EvalResult<T> = Result<T, EvalError>;

/// Successful evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Numeric result, kept as the last answer
    pub value: f64,
    /// Normalised text that replaces the buffer
    pub rendered: String,
}

/// Constrained arithmetic evaluator
pub struct Evaluator;

impl Evaluator {
    /// Evaluate a raw buffer and normalise the result
    pub fn evaluate(raw: &str) -> EvalResult<Evaluation> {
        let value = Self::value_of(raw)?;
        Ok(Evaluation {
            value,
            rendered: Self::render(value),
        })
    }

    /// Numeric value of a raw buffer
    pub fn value_of(raw: &str) -> EvalResult<f64> {
        let prepared = Self::prepare(raw)?;
        let tokens = Lexer::new(&prepared).tokenize()?;
        if tokens.is_empty() {
            return Err(EvalError::Empty);
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let value = parser.parse_expr()?;
        if let Some(tok) = parser.tokens.get(parser.pos) {
            return Err(EvalError::UnexpectedToken {
                position: tok.position,
            });
        }

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }

    /// Numeric-only path used by memory keys. Anything that does not evaluate
    /// to a finite number is `None`.
    pub fn numeric_value(raw: &str) -> Option<f64> {
        Self::value_of(raw).ok()
    }

    /// Strip separators, map display glyphs to ASCII operators and check the
    /// character set.
    pub fn prepare(raw: &str) -> EvalResult<String> {
        let mut out = String::with_capacity(raw.len());
        for ch in raw.chars() {
            let mapped = match ch {
                GROUP_SEPARATOR => continue,
                '×' => '*',
                '÷' => '/',
                c if c.is_whitespace() => ' ',
                c => c,
            };
            let allowed = mapped.is_ascii_digit()
                || mapped == ' '
                || matches!(mapped, '.' | '+' | '-' | '*' | '/' | '(' | ')' | 'e');
            if !allowed {
                return Err(EvalError::InvalidCharacter(ch));
            }
            out.push(mapped);
        }
        Ok(out)
    }

    /// Normalise a result for the buffer.
    ///
    /// Exponential form with 9 fraction digits when the plain form has more
    /// than 15 significant characters, the magnitude exceeds 1e15, or a
    /// non-zero magnitude is below 1e-9. Plain form otherwise.
    pub fn render(value: f64) -> String {
        let magnitude = value.abs();
        if magnitude > MAX_PLAIN_MAGNITUDE || (magnitude < MIN_PLAIN_MAGNITUDE && value != 0.0) {
            return to_exponential(value, EXPONENT_FRACTION_DIGITS);
        }

        let plain = plain_decimal(value);
        let significant = plain.chars().filter(|&c| c != '.' && c != '-').count();
        if significant > MAX_PLAIN_DIGITS {
            to_exponential(value, EXPONENT_FRACTION_DIGITS)
        } else {
            plain
        }
    }
}

/// Shortest round-trip text of `value`. Tiny magnitudes use the shortest
/// exponential form; negative zero prints as `0`.
fn plain_decimal(value: f64) -> String {
    if value == 0.0 {
        return String::from("0");
    }
    if value.abs() < 1e-6 {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Fixed-fraction exponential text with a signed exponent: `2.500000000e+16`
fn to_exponential(value: f64, fraction_digits: usize) -> String {
    let text = format!("{:.*e}", fraction_digits, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// `input` has passed `prepare`, so it is pure ASCII
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn tokenize(mut self) -> EvalResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            let Some(byte) = self.peek() else {
                return Ok(tokens);
            };

            let position = self.pos;
            let kind = match byte {
                b'0'..=b'9' | b'.' => self.scan_number()?,
                b'+' => self.single(TokenKind::Plus),
                b'-' => self.single(TokenKind::Minus),
                b'*' => self.single(TokenKind::Star),
                b'/' => self.single(TokenKind::Slash),
                b'(' => self.single(TokenKind::LParen),
                b')' => self.single(TokenKind::RParen),
                other => return Err(EvalError::InvalidCharacter(other as char)),
            };
            tokens.push(Token { kind, position });
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn scan_number(&mut self) -> EvalResult<TokenKind> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit() || b == b'.') {
            self.pos += 1;
        }
        if self.peek() == Some(b'e') {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let literal = core::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| EvalError::UnexpectedToken { position: start })?;
        literal
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| EvalError::MalformedNumber(String::from(literal)))
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn advance(&mut self) -> EvalResult<Token> {
        let tok = self.tokens.get(self.pos).copied().ok_or(EvalError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(tok)
    }

    /// Run `f` one nesting level deeper; too deep is an unexpected token at `position`
    fn nested(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> EvalResult<f64>,
    ) -> EvalResult<f64> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::UnexpectedToken { position });
        }
        self.depth += 1;
        let value = f(self);
        self.depth -= 1;
        value
    }

    fn parse_expr(&mut self) -> EvalResult<f64> {
        let mut value = self.parse_term()?;
        loop {
            match self.peek() {
                Some(TokenKind::Plus) => {
                    self.pos += 1;
                    value += self.parse_term()?;
                }
                Some(TokenKind::Minus) => {
                    self.pos += 1;
                    value -= self.parse_term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_term(&mut self) -> EvalResult<f64> {
        let mut value = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(TokenKind::Star) => {
                    self.pos += 1;
                    value *= self.parse_unary()?;
                }
                Some(TokenKind::Slash) => {
                    self.pos += 1;
                    value /= self.parse_unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_unary(&mut self) -> EvalResult<f64> {
        let sign = match self.peek() {
            Some(TokenKind::Minus) => -1.0,
            Some(TokenKind::Plus) => 1.0,
            _ => return self.parse_primary(),
        };
        let tok = self.advance()?;
        let value = self.nested(tok.position, Self::parse_unary)?;
        Ok(sign * value)
    }

    fn parse_primary(&mut self) -> EvalResult<f64> {
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::Number(value) => Ok(value),
            TokenKind::LParen => {
                let value = self.nested(tok.position, Self::parse_expr)?;
                let close = self.advance()?;
                if close.kind == TokenKind::RParen {
                    Ok(value)
                } else {
                    Err(EvalError::UnexpectedToken {
                        position: close.position,
                    })
                }
            }
            _ => Err(EvalError::UnexpectedToken {
                position: tok.position,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(raw: &str) -> EvalResult<f64> {
        Evaluator::value_of(raw)
    }

    #[test]
    fn test_simple_sum() {
        let result = Evaluator::evaluate("5 + 3").unwrap();
        assert_eq!(result.value, 8.0);
        assert_eq!(result.rendered, "8");
    }

    #[test]
    fn test_precedence_and_parens() {
        assert_eq!(eval("2 + 3 × 4"), Ok(14.0));
        assert_eq!(eval("(2 + 3) × 4"), Ok(20.0));
        assert_eq!(eval("10 - 4 - 3"), Ok(3.0));
        assert_eq!(eval("100 ÷ 4 ÷ 5"), Ok(5.0));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval(" - 3"), Ok(-3.0));
        assert_eq!(eval("5 -  - 3"), Ok(8.0));
        assert_eq!(eval("-(2 + 1)"), Ok(-3.0));
        assert_eq!(eval(" + 7"), Ok(7.0));
    }

    #[test]
    fn test_separators_stripped() {
        assert_eq!(eval("1,000,000 + 1"), Ok(1_000_001.0));
    }

    #[test]
    fn test_lenient_literals() {
        assert_eq!(eval("5."), Ok(5.0));
        assert_eq!(eval(".5 + .5"), Ok(1.0));
        assert_eq!(eval("2.5e+16"), Ok(2.5e16));
        assert_eq!(eval("1.5e-7"), Ok(1.5e-7));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(eval("5 + a"), Err(EvalError::InvalidCharacter('a')));
        assert_eq!(eval("2 ^ 3"), Err(EvalError::InvalidCharacter('^')));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(eval("5 + "), Err(EvalError::UnexpectedEnd));
        assert!(matches!(eval("1.2.3"), Err(EvalError::MalformedNumber(_))));
        assert!(matches!(eval("5e"), Err(EvalError::MalformedNumber(_))));
        assert!(matches!(eval("e"), Err(EvalError::InvalidCharacter('e'))));
        assert!(matches!(eval("(1 + 2"), Err(EvalError::UnexpectedEnd)));
        assert!(matches!(eval("1 + 2)"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(eval("2(3)"), Err(EvalError::UnexpectedToken { .. })));
        assert_eq!(eval("   "), Err(EvalError::Empty));
    }

    #[test]
    fn test_division_by_zero_is_not_finite() {
        assert_eq!(eval("1 ÷ 0"), Err(EvalError::NonFinite));
        assert_eq!(eval("1 / 0"), Err(EvalError::NonFinite));
        assert_eq!(eval("0 ÷ 0"), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(Evaluator::render(8.0), "8");
        assert_eq!(Evaluator::render(-8.0), "-8");
        assert_eq!(Evaluator::render(0.5), "0.5");
        assert_eq!(Evaluator::render(-0.0), "0");
        assert_eq!(Evaluator::render(999_999_999_999_999.0), "999999999999999");
        assert_eq!(Evaluator::render(123456789.125), "123456789.125");
    }

    #[test]
    fn test_render_exponential_large() {
        assert_eq!(Evaluator::render(2.5e16), "2.500000000e+16");
        assert_eq!(Evaluator::render(-2.5e16), "-2.500000000e+16");
        // 1e15 itself prints 16 digits, so the digit rule already applies
        assert_eq!(Evaluator::render(1e15), "1.000000000e+15");
        assert_eq!(Evaluator::render(1e15 + 2.0), "1.000000000e+15");
    }

    #[test]
    fn test_render_exponential_small() {
        assert_eq!(Evaluator::render(1e-10), "1.000000000e-10");
        // Between 1e-9 and 1e-6 the shortest exponential form is kept
        assert_eq!(Evaluator::render(1.5e-7), "1.5e-7");
    }

    #[test]
    fn test_render_exponential_for_long_digits() {
        assert_eq!(Evaluator::render(0.1 + 0.2), "3.000000000e-1");
        assert_eq!(Evaluator::render(1.0 / 3.0), "3.333333333e-1");
    }

    #[test]
    fn test_evaluate_twice_is_stable() {
        for raw in ["5 + 3", "2.5 × 4", "25000000000 × 1000000", "7 ÷ 2"] {
            let first = Evaluator::evaluate(raw).unwrap();
            let second = Evaluator::evaluate(&first.rendered).unwrap();
            assert_eq!(first, second, "re-evaluating {raw}");
        }
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(Evaluator::numeric_value("12"), Some(12.0));
        assert_eq!(Evaluator::numeric_value("12 + "), None);
        assert_eq!(Evaluator::numeric_value("1 ÷ 0"), None);
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let shallow = alloc::format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(eval(&shallow), Ok(1.0));

        let deep = alloc::format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
        assert!(matches!(eval(&deep), Err(EvalError::UnexpectedToken { .. })));

        let signs = alloc::format!("{}1", "-".repeat(5000));
        assert!(matches!(eval(&signs), Err(EvalError::UnexpectedToken { .. })));
        assert_eq!(eval("- - 1"), Ok(1.0));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            alloc::format!("{}", EvalError::InvalidCharacter('x')),
            "Invalid character: 'x'"
        );
        assert_eq!(
            alloc::format!("{}", EvalError::NonFinite),
            "Result is not a finite number"
        );
    }
}
