//! Arithmetic operator implementations on values.
//!
//! Provides direct enum-based dispatch for binary operations. The type set
//! is closed, so pattern matching is preferred over trait objects.
//!
//! Both operands must carry the same tag. Integer arithmetic is checked,
//! byte arithmetic wraps modulo 256, and float arithmetic follows IEEE 754.

use std::fmt;

use crate::errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, invalid_binary_op, modulo_by_zero,
    EvalResult,
};
use crate::value::{ScalarInt, Value};

/// Arithmetic operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Source symbol of the operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

// Helper functions for repetitive checked arithmetic patterns

/// Checked arithmetic operation with overflow handling.
#[inline]
fn checked_arith(result: Option<ScalarInt>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

// Direct Dispatch Function

/// Evaluate an arithmetic operation.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Byte(a), Value::Byte(b)) => eval_byte_binary(*a, *b, op),
        _ if left.tag() == right.tag() => Err(invalid_binary_op(left.type_name(), op)),
        _ => Err(binary_type_mismatch(left.type_name(), right.type_name())),
    }
}

// Type-Specific Evaluation Functions

/// Binary operations on integers.
///
/// Division truncates toward zero; the remainder takes the sign of the
/// dividend.
fn eval_int_binary(a: ScalarInt, b: ScalarInt, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b.is_zero() => Err(division_by_zero()),
        BinaryOp::Div => checked_arith(a.checked_div(b), "division"),
        BinaryOp::Mod if b.is_zero() => Err(modulo_by_zero()),
        BinaryOp::Mod => checked_arith(a.checked_rem(b), "remainder"),
    }
}

/// Binary operations on floats.
#[allow(
    clippy::arithmetic_side_effects,
    reason = "IEEE float arithmetic cannot panic; overflow yields infinity"
)]
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod => Err(invalid_binary_op("float", op)),
    }
}

/// Binary operations on bytes. Results wrap modulo 256.
fn eval_byte_binary(a: u8, b: u8, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Byte(a.wrapping_add(b))),
        BinaryOp::Sub => Ok(Value::Byte(a.wrapping_sub(b))),
        BinaryOp::Mul => Ok(Value::Byte(a.wrapping_mul(b))),
        BinaryOp::Div => a
            .checked_div(b)
            .map(Value::Byte)
            .ok_or_else(division_by_zero),
        BinaryOp::Mod => Err(invalid_binary_op("byte", op)),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
