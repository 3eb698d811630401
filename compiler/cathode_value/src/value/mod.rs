//! Runtime values for the Cathode interpreter.
//!
//! # Closed Variant Set
//!
//! `Value` is an exhaustive enum over the ten runtime variants. Every
//! conversion to a concrete payload goes through an `as_*` accessor that
//! returns `None` on a tag mismatch, so a wrong-variant unwrap cannot happen
//! silently.
//!
//! # Shared Containers
//!
//! Heap payloads are reference counted:
//!
//! ```text
//! let s = Value::string("hello");              // Heap<String>, immutable
//! let arr = Value::array(vec![Value::int(1)]); // ArrayValue, shared + mutable
//! let alias = arr.clone();                     // same container as `arr`
//! ```
//!
//! `Array`, `Struct` and `FileHandle` use `Arc` with `parking_lot` locks, so
//! `Value` stays `Send + Sync` even though the interpreter itself drives one
//! call at a time.

mod composite;
mod handle;
mod heap;
mod scalar_int;

use std::fmt;

use composite::{ActivePairs, ContainerId};
pub use composite::{ArrayValue, StructValue};
pub use handle::FileHandle;
pub use heap::Heap;
pub use scalar_int::ScalarInt;

/// Discriminant of a `Value`.
///
/// Discriminant values are stable (`String = 0` through `Array = 9`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ValueTag {
    String = 0,
    Float,
    Integer,
    Byte,
    FileHandle,
    LongPointer,
    Void,
    Struct,
    Tuple,
    Array,
}

impl ValueTag {
    /// Every tag, in declaration order.
    pub const ALL: [ValueTag; 10] = [
        ValueTag::String,
        ValueTag::Float,
        ValueTag::Integer,
        ValueTag::Byte,
        ValueTag::FileHandle,
        ValueTag::LongPointer,
        ValueTag::Void,
        ValueTag::Struct,
        ValueTag::Tuple,
        ValueTag::Array,
    ];

    /// Canonical script-visible type name.
    pub const fn name(self) -> &'static str {
        match self {
            ValueTag::String => "string",
            ValueTag::Float => "float",
            ValueTag::Integer => "integer",
            ValueTag::Byte => "byte",
            ValueTag::FileHandle => "filehandle",
            ValueTag::LongPointer => "longpointer",
            ValueTag::Void => "void",
            ValueTag::Struct => "struct",
            ValueTag::Tuple => "tuple",
            ValueTag::Array => "array",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value in the Cathode interpreter.
#[derive(Clone)]
pub enum Value {
    // Primitives (inline, no heap allocation)
    /// Floating-point value.
    Float(f64),
    /// Integer value (uses `ScalarInt` to prevent unchecked arithmetic).
    Int(ScalarInt),
    /// Byte value. Arithmetic wraps modulo 256.
    Byte(u8),
    /// Raw address-sized integer, opaque to scripts.
    LongPointer(usize),
    /// Void (unit) value.
    Void,

    // Heap Types
    /// String value.
    Str(Heap<String>),
    /// Pair of values.
    Tuple(Heap<(Value, Value)>),
    /// Shared, mutable sequence of values.
    Array(ArrayValue),
    /// Shared, mutable field map.
    Struct(StructValue),
    /// Handle to an OS file stream. The stream may be absent once closed.
    FileHandle(FileHandle),
}

// Factory Methods

impl Value {
    /// Canonical integer `0`.
    pub const ZERO: Value = Value::Int(ScalarInt::ZERO);

    /// Canonical integer `1`.
    pub const ONE: Value = Value::Int(ScalarInt::ONE);

    /// Canonical integer `-1`.
    pub const NEG_ONE: Value = Value::Int(ScalarInt::NEG_ONE);

    /// Create an integer value from a raw `i64`.
    ///
    /// `-1`, `0` and `1` come from the canonical constants. Integers are
    /// stored inline, so this never affects equality or mutation.
    #[inline]
    pub fn int(n: i64) -> Self {
        match n {
            -1 => Value::NEG_ONE,
            0 => Value::ZERO,
            1 => Value::ONE,
            _ => Value::Int(ScalarInt::new(n)),
        }
    }

    /// Create an integer truth value (`1` or `0`).
    #[inline]
    pub fn truth(flag: bool) -> Self {
        if flag {
            Value::ONE
        } else {
            Value::ZERO
        }
    }

    /// Create a string value.
    ///
    /// ```text
    /// let s = Value::string("hello");
    /// let s2 = Value::string(format!("value: {}", x));
    /// ```
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a tuple value.
    #[inline]
    pub fn tuple(first: Value, second: Value) -> Self {
        Value::Tuple(Heap::new((first, second)))
    }

    /// Create an array value that owns `items`.
    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(ArrayValue::new(items))
    }

    /// Create an array value by copying `items`.
    ///
    /// The new array never shares storage with the caller's slice.
    #[inline]
    pub fn array_from_slice(items: &[Value]) -> Self {
        Value::Array(ArrayValue::from_slice(items))
    }

    /// Create an array of `Byte` values.
    pub fn bytes(data: &[u8]) -> Self {
        Value::array(data.iter().copied().map(Value::Byte).collect())
    }

    /// Create an empty struct value.
    #[inline]
    pub fn empty_struct() -> Self {
        Value::Struct(StructValue::new())
    }

    /// Create a struct value from field name/value pairs.
    ///
    /// Later duplicates of a field name replace earlier ones.
    pub fn structure<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Struct(StructValue::from_fields(fields))
    }

    /// Wrap an open file handle.
    #[inline]
    pub fn file_handle(handle: FileHandle) -> Self {
        Value::FileHandle(handle)
    }
}

// Value Methods

impl Value {
    /// The variant tag of this value.
    pub const fn tag(&self) -> ValueTag {
        match self {
            Value::Str(_) => ValueTag::String,
            Value::Float(_) => ValueTag::Float,
            Value::Int(_) => ValueTag::Integer,
            Value::Byte(_) => ValueTag::Byte,
            Value::FileHandle(_) => ValueTag::FileHandle,
            Value::LongPointer(_) => ValueTag::LongPointer,
            Value::Void => ValueTag::Void,
            Value::Struct(_) => ValueTag::Struct,
            Value::Tuple(_) => ValueTag::Tuple,
            Value::Array(_) => ValueTag::Array,
        }
    }

    /// Get the type name for diagnostics and script-level introspection.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    /// Check if this value is `Void`.
    #[inline]
    pub const fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Try to convert to an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(n.raw()),
            _ => None,
        }
    }

    /// Try to convert to a float.
    ///
    /// Integers are promoted; this is the promotion used by the
    /// Integer/Float equality rule.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(n.to_f64()),
            _ => None,
        }
    }

    /// Try to convert to a byte.
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Value::Byte(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to convert to a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to a raw pointer value.
    pub fn as_pointer(&self) -> Option<usize> {
        match self {
            Value::LongPointer(p) => Some(*p),
            _ => None,
        }
    }

    /// Try to convert to a tuple.
    pub fn as_tuple(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Tuple(pair) => Some((&pair.0, &pair.1)),
            _ => None,
        }
    }

    /// Try to convert to an array handle.
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to convert to a struct handle.
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to a file handle.
    pub fn as_file_handle(&self) -> Option<&FileHandle> {
        match self {
            Value::FileHandle(h) => Some(h),
            _ => None,
        }
    }

    /// Render the value as script-visible text.
    ///
    /// Same output as the `Display` impl.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Check equality with another value.
    ///
    /// Same-variant comparisons are structural, with two exceptions:
    /// file handles compare by identity, and containers short-circuit when
    /// both sides are the same shared container. `Int` and `Float` compare
    /// numerically after promoting the integer. Every other cross-variant
    /// pair is unequal. Containers that hold themselves compare without
    /// looping.
    pub fn equals(&self, other: &Value) -> bool {
        self.equals_within(other, &mut ActivePairs::new())
    }

    #[expect(
        clippy::float_cmp,
        reason = "script equality is exact IEEE comparison, not approximate"
    )]
    fn equals_within(&self, other: &Value, active: &mut ActivePairs) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => a.to_f64() == *b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::LongPointer(a), Value::LongPointer(b)) => a == b,
            (Value::Void, Value::Void) => true,
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.0.equals_within(&b.0, active) && a.1.equals_within(&b.1, active)
            }
            (Value::Array(a), Value::Array(b)) => a.content_equals(b, active),
            (Value::Struct(a), Value::Struct(b)) => a.content_equals(b, active),
            (Value::FileHandle(a), Value::FileHandle(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// `open` holds the arrays currently being rendered.
    fn fmt_within(
        &self,
        f: &mut fmt::Formatter<'_>,
        open: &mut Vec<ContainerId>,
    ) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Float(n) => write!(f, "{n}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Byte(b) => write!(f, "{b}"),
            Value::FileHandle(h) => write!(f, "{h}"),
            Value::LongPointer(p) => write!(f, "{p}"),
            Value::Void => f.write_str("[void]"),
            Value::Struct(_) => f.write_str("[struct]"),
            Value::Tuple(pair) => {
                f.write_str("(")?;
                pair.0.fmt_within(f, open)?;
                f.write_str(", ")?;
                pair.1.fmt_within(f, open)?;
                f.write_str(")")
            }
            Value::Array(items) => items.render_within(f, open),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Byte(b) => write!(f, "Byte({b})"),
            Value::FileHandle(h) => write!(f, "FileHandle({h:?})"),
            Value::LongPointer(p) => write!(f, "LongPointer({p:#x})"),
            Value::Void => write!(f, "Void"),
            Value::Struct(s) => write!(f, "Struct({s:?})"),
            Value::Tuple(pair) => write!(f, "Tuple({:?}, {:?})", pair.0, pair.1),
            Value::Array(items) => write!(f, "Array({items:?})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_within(f, &mut Vec::new())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

// Conversions from native literals

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<u8> for Value {
    fn from(b: u8) -> Self {
        Value::Byte(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Void
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
