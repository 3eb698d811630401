#![deny(clippy::arithmetic_side_effects)]
#![allow(
    clippy::result_large_err,
    reason = "EvalError is returned everywhere; boxing would add an allocation per error"
)]
//! Cathode Value - Runtime value model for the Cathode scripting language.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `Heap`, `ArrayValue`, `StructValue`, `FileHandle`)
//! - Literal conversion (`parse_literal`, `Literal`)
//! - Arithmetic operators on values (`evaluate_binary`)
//! - Evaluation error types (`EvalError`, `EvalErrorKind`, `EvalResult`)
//!
//! # Sharing Semantics
//!
//! Cloning a `Value` never copies a container. `Array`, `Struct` and
//! `FileHandle` payloads are shared handles with interior mutability, so a
//! mutation through one clone is visible through every other clone. Strings
//! and tuples are shared too, but immutable.

mod conversion;
mod errors;
mod operators;
mod value;

pub use conversion::{parse_literal, Literal};
pub use errors::{EvalError, EvalErrorKind, EvalNote, EvalResult};
pub use operators::{evaluate_binary, BinaryOp};
pub use value::{ArrayValue, FileHandle, Heap, ScalarInt, StructValue, Value, ValueTag};

// Re-export error constructors for use by other crates
pub use errors::{
    // Binary operation errors
    binary_type_mismatch,
    division_by_zero,
    integer_overflow,
    invalid_binary_op,
    modulo_by_zero,
    // Native call errors
    invalid_argument,
    invalid_handle,
    native_failure,
    type_mismatch,
    undefined_function,
    unsupported_literal,
    wrong_arg_count,
};
