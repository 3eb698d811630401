#![allow(
    clippy::result_large_err,
    reason = "EvalError is returned everywhere; boxing would add an allocation per error"
)]
//! Cathode Stdlib - Standard native modules for the Cathode scripting language.
//!
//! - `core`: value introspection helpers (`typeName`, `toString`, ...)
//! - `fileio`: directory and file-handle operations
//!
//! OS failures inside these modules never become errors. They are logged at
//! `debug` level and reduced to sentinels: Integer 0 for boolean-flavored
//! operations, Void for operations that produce no object.

mod builtins;
mod fileio;

pub use builtins::BuiltinsModule;
pub use fileio::{FileIoModule, FILEIO_NAMESPACE};

use cathode_native::{NativeRegistry, NativeRegistryBuilder, RegistryError};

/// Register every standard module, `core` first, then `fileio`.
pub fn register_standard_modules(builder: &mut NativeRegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register_module(&BuiltinsModule)?
        .register_module(&FileIoModule)?;
    Ok(())
}

/// A registry holding only the standard modules.
pub fn standard_registry() -> Result<NativeRegistry, RegistryError> {
    let mut builder = NativeRegistryBuilder::new();
    register_standard_modules(&mut builder)?;
    Ok(builder.build())
}
