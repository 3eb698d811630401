//! Literal-to-value conversion.
//!
//! The evaluator hands literal tokens to this module either already
//! classified (`Literal`) or as raw text (`parse_literal`).

use crate::value::Value;

/// A classified source literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Str(String),
    Float(f64),
    Int(i64),
    Byte(u8),
}

impl Literal {
    /// Convert into a runtime value.
    pub fn into_value(self) -> Value {
        match self {
            Literal::Str(s) => Value::string(s),
            Literal::Float(f) => Value::Float(f),
            Literal::Int(n) => Value::int(n),
            Literal::Byte(b) => Value::Byte(b),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        literal.into_value()
    }
}

/// Classify raw literal text and convert it into a value.
///
/// - decimal integer text that fits in `i64` becomes `Int`
/// - text with a decimal point or exponent that parses as `f64` becomes `Float`
/// - anything else becomes `Str` with the text unchanged
///
/// Rendering the result reproduces canonical integer text, float text as
/// produced by `f64`'s `Display`, and plain strings.
pub fn parse_literal(text: &str) -> Value {
    if is_decimal_integer(text) {
        if let Ok(n) = text.parse::<i64>() {
            return Value::int(n);
        }
    }
    if looks_like_float(text) {
        if let Ok(f) = text.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::string(text)
}

/// Optional leading `-` followed by one or more ASCII digits.
fn is_decimal_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Digits with a `.` or exponent, and nothing `f64::from_str` would accept
/// as a word (`inf`, `NaN`).
fn looks_like_float(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body.contains(|c: char| c.is_ascii_digit())
        && body.contains(['.', 'e', 'E'])
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}
