//! Error types for value operations and native calls.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` provides typed error categories so the evaluator can
//! match on the failure instead of parsing messages. Factory functions
//! (e.g. `division_by_zero()`) are the public API; they populate both
//! `kind` and `message`.
//!
//! Every error here is script-visible and recoverable: the evaluator decides
//! whether to report it or hand it to a script-level handler. OS failures
//! inside native functions never reach this type; they are reduced to
//! sentinel values first.

use crate::value::Value;
use std::fmt;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category for structured diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    ModuloByZero,
    IntegerOverflow {
        operation: String,
    },

    // Type/Operator
    TypeMismatch {
        expected: String,
        got: String,
    },
    InvalidBinaryOp {
        type_name: String,
        op: String,
    },
    BinaryTypeMismatch {
        left: String,
        right: String,
    },

    // Native calls
    UndefinedFunction {
        namespace: String,
        name: String,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    InvalidHandle {
        operation: String,
    },
    UnsupportedLiteral {
        what: String,
        value: String,
    },
    InvalidArgument {
        function: String,
        reason: String,
    },
    NativeFailure {
        function: String,
        message: String,
    },

    /// Catch-all for errors not yet categorized into structured kinds.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Arithmetic
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }

            // Type/Operator
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::InvalidBinaryOp { type_name, op } => {
                write!(f, "operator `{op}` cannot be applied to {type_name}")
            }
            Self::BinaryTypeMismatch { left, right } => {
                write!(f, "cannot apply operator to `{left}` and `{right}`")
            }

            // Native calls
            Self::UndefinedFunction { namespace, name } => {
                write!(f, "undefined function: {namespace}.{name}")
            }
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                if name.is_empty() {
                    write!(f, "expected {expected} {arg_word}, got {got}")
                } else {
                    write!(f, "{name} expects {expected} {arg_word}, got {got}")
                }
            }
            Self::InvalidHandle { operation } => {
                write!(f, "{operation}: file handle is closed")
            }
            Self::UnsupportedLiteral { what, value } => {
                write!(f, "unsupported {what} \"{value}\"")
            }
            Self::InvalidArgument { function, reason } => {
                write!(f, "{function}: {reason}")
            }
            Self::NativeFailure { function, message } => {
                write!(f, "native function {function} failed: {message}")
            }

            // Custom
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Additional context note attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
}

impl EvalNote {
    /// Create a note.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable error message. Equals `kind.to_string()` for
    /// factory-created errors.
    pub message: String,
    /// Additional context notes providing secondary information.
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the specific factory functions when a
    /// structured kind is available.
    pub fn new(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: msg.clone(),
            },
            message: msg,
            notes: Vec::new(),
        }
    }

    /// Create an error from a structured kind.
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            notes: Vec::new(),
        }
    }

    /// Attach a context note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(EvalNote::new(note));
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Binary Operation Errors

/// Operator not defined for a type.
#[cold]
pub fn invalid_binary_op(type_name: &str, op: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        type_name: type_name.to_string(),
        op: op.to_string(),
    })
}

/// Operands of different types.
#[cold]
pub fn binary_type_mismatch(left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// Division by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Modulo by zero.
#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

/// Integer overflow in an arithmetic operation.
#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

// Native Call Errors

/// No native function registered under `namespace.name`.
#[cold]
pub fn undefined_function(namespace: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        namespace: namespace.to_string(),
        name: name.to_string(),
    })
}

/// Wrong number of arguments for a function.
#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

/// A value of the wrong variant was supplied.
#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// Stream operation on a closed file handle.
#[cold]
pub fn invalid_handle(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidHandle {
        operation: operation.to_string(),
    })
}

/// Unrecognized mode, encoding, or similar literal argument.
#[cold]
pub fn unsupported_literal(what: &str, value: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedLiteral {
        what: what.to_string(),
        value: value.to_string(),
    })
}

/// Argument has the right type but an unusable value.
#[cold]
pub fn invalid_argument(function: &str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument {
        function: function.to_string(),
        reason: reason.into(),
    })
}

/// A native function aborted (panicked) instead of returning.
#[cold]
pub fn native_failure(function: &str, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NativeFailure {
        function: function.to_string(),
        message: message.into(),
    })
}
