//! Argument and return marshalling for native functions.
//!
//! `FromValue` unpacks a script value into a concrete Rust argument type,
//! `IntoValue` repacks a Rust result. `IntoNativeFn` turns ordinary closures
//! of up to three typed arguments into type-erased `NativeFunction`s.

use std::marker::PhantomData;

use cathode_value::{
    type_mismatch, ArrayValue, EvalError, EvalResult, FileHandle, StructValue, Value,
};

/// Result of a native function body.
pub type NativeResult<T> = Result<T, EvalError>;

/// Expected-type name for arguments that accept any value.
pub const ANY_TYPE: &str = "any";

/// Conversion from a script value to a native argument.
pub trait FromValue: Sized {
    /// Type name reported when conversion fails.
    const EXPECTED: &'static str;

    /// `None` when the value carries the wrong tag.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = ANY_TYPE;

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromValue for u8 {
    const EXPECTED: &'static str = "byte";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_byte()
    }
}

impl FromValue for usize {
    const EXPECTED: &'static str = "longpointer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_pointer()
    }
}

impl FromValue for FileHandle {
    const EXPECTED: &'static str = "filehandle";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_file_handle().cloned()
    }
}

impl FromValue for ArrayValue {
    const EXPECTED: &'static str = "array";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_array().cloned()
    }
}

impl FromValue for StructValue {
    const EXPECTED: &'static str = "struct";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_struct().cloned()
    }
}

impl FromValue for (Value, Value) {
    const EXPECTED: &'static str = "tuple";

    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_tuple()
            .map(|(first, second)| (first.clone(), second.clone()))
    }
}

/// Conversion from a native result to a script value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Void
    }
}

/// Booleans use the integer sentinel convention: 1 or 0.
impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::truth(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::int(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for u8 {
    fn into_value(self) -> Value {
        Value::Byte(self)
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        Value::LongPointer(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for FileHandle {
    fn into_value(self) -> Value {
        Value::FileHandle(self)
    }
}

impl IntoValue for ArrayValue {
    fn into_value(self) -> Value {
        Value::Array(self)
    }
}

impl IntoValue for StructValue {
    fn into_value(self) -> Value {
        Value::Struct(self)
    }
}

impl IntoValue for (Value, Value) {
    fn into_value(self) -> Value {
        Value::tuple(self.0, self.1)
    }
}

impl IntoValue for Vec<Value> {
    fn into_value(self) -> Value {
        Value::array(self)
    }
}

/// Raw bytes become an array of `Byte` values.
impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::bytes(&self)
    }
}

/// `None` becomes `Void`.
impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Void, IntoValue::into_value)
    }
}

/// Convert one argument, noting its 1-based position on failure.
pub fn convert_arg<T: FromValue>(value: &Value, position: usize) -> NativeResult<T> {
    T::from_value(value).ok_or_else(|| {
        type_mismatch(T::EXPECTED, value.type_name()).with_note(format!("argument {position}"))
    })
}

/// A type-erased native function.
///
/// The registry checks `args.len() == arity()` before calling `invoke`.
pub trait NativeFunction: Send + Sync {
    fn arity(&self) -> usize;

    /// Expected type name of each parameter, in order.
    fn param_types(&self) -> Vec<&'static str>;

    fn invoke(&self, args: &[Value]) -> EvalResult;
}

/// Conversion of a typed closure into a `NativeFunction`.
///
/// `Args` is inferred from the closure signature and never named by callers.
pub trait IntoNativeFn<Args> {
    fn into_native(self) -> Box<dyn NativeFunction>;
}

/// Typed closure adapter produced by `IntoNativeFn`.
struct TypedNative<F, Args> {
    f: F,
    _args: PhantomData<fn(Args)>,
}

macro_rules! impl_native_fn {
    ($arity:literal; $($ty:ident $arg:ident $pos:literal),*) => {
        impl<F, R, $($ty,)*> NativeFunction for TypedNative<F, ($($ty,)*)>
        where
            F: Fn($($ty),*) -> NativeResult<R> + Send + Sync + 'static,
            R: IntoValue,
            $($ty: FromValue + 'static,)*
        {
            fn arity(&self) -> usize {
                $arity
            }

            fn param_types(&self) -> Vec<&'static str> {
                vec![$($ty::EXPECTED),*]
            }

            fn invoke(&self, args: &[Value]) -> EvalResult {
                let [$($arg),*] = args else {
                    return Err(cathode_value::wrong_arg_count("", $arity, args.len()));
                };
                $(let $arg = convert_arg::<$ty>($arg, $pos)?;)*
                (self.f)($($arg),*).map(IntoValue::into_value)
            }
        }

        impl<F, R, $($ty,)*> IntoNativeFn<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> NativeResult<R> + Send + Sync + 'static,
            R: IntoValue,
            $($ty: FromValue + 'static,)*
        {
            fn into_native(self) -> Box<dyn NativeFunction> {
                Box::new(TypedNative {
                    f: self,
                    _args: PhantomData,
                })
            }
        }
    };
}

impl_native_fn!(0;);
impl_native_fn!(1; A1 a1 1);
impl_native_fn!(2; A1 a1 1, A2 a2 2);
impl_native_fn!(3; A1 a1 1, A2 a2 2, A3 a3 3);

/// A native function over the raw argument slice with an explicit arity.
///
/// Arguments are passed through unconverted; the body is responsible for
/// checking tags (see `convert_arg`).
pub struct RawNative<F> {
    arity: usize,
    f: F,
}

impl<F> RawNative<F>
where
    F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
{
    pub fn new(arity: usize, f: F) -> Self {
        RawNative { arity, f }
    }
}

impl<F> NativeFunction for RawNative<F>
where
    F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
{
    fn arity(&self) -> usize {
        self.arity
    }

    fn param_types(&self) -> Vec<&'static str> {
        vec![ANY_TYPE; self.arity]
    }

    fn invoke(&self, args: &[Value]) -> EvalResult {
        (self.f)(args)
    }
}

/// Marker for registering a `RawNative` through `IntoNativeFn`.
pub enum RawArgs {}

impl<F> IntoNativeFn<RawArgs> for RawNative<F>
where
    F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
{
    fn into_native(self) -> Box<dyn NativeFunction> {
        Box::new(self)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
