//! The `core` namespace: introspection helpers available to every script.

use cathode_native::{
    NativeDescriptor, NativeModule, NativeRegistryBuilder, NativeResult, RegistryError,
    CORE_NAMESPACE,
};
use cathode_value::Value;

/// Registers `core.typeName`, `core.toString`, `core.equals`, `core.tuple`
/// and `core.strLen`.
pub struct BuiltinsModule;

impl NativeModule for BuiltinsModule {
    fn namespace(&self) -> &str {
        CORE_NAMESPACE
    }

    fn register(&self, builder: &mut NativeRegistryBuilder) -> Result<(), RegistryError> {
        // Descriptors without a namespace land in `core`.
        builder
            .register(NativeDescriptor::with_params("typeName", ["value"]), type_name)?
            .register(NativeDescriptor::with_params("toString", ["value"]), to_string)?
            .register(NativeDescriptor::with_params("equals", ["a", "b"]), equals)?
            .register(NativeDescriptor::with_params("tuple", ["a", "b"]), tuple)?
            .register(NativeDescriptor::with_params("strLen", ["s"]), str_len)?;
        Ok(())
    }
}

fn type_name(value: Value) -> NativeResult<&'static str> {
    Ok(value.type_name())
}

fn to_string(value: Value) -> NativeResult<String> {
    Ok(value.render())
}

fn equals(a: Value, b: Value) -> NativeResult<bool> {
    Ok(a.equals(&b))
}

fn tuple(a: Value, b: Value) -> NativeResult<(Value, Value)> {
    Ok((a, b))
}

/// Length in chars, not bytes.
fn str_len(s: String) -> NativeResult<i64> {
    Ok(i64::try_from(s.chars().count()).unwrap_or(i64::MAX))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
