#![allow(
    clippy::result_large_err,
    reason = "EvalError is returned everywhere; boxing would add an allocation per error"
)]
//! Cathode Native - Native function registry and marshalling boundary.
//!
//! This crate provides:
//! - Native function descriptors (`NativeDescriptor`)
//! - Argument and return marshalling (`FromValue`, `IntoValue`, `IntoNativeFn`)
//! - An immutable registry built by an explicit registration step
//!   (`NativeRegistryBuilder`, `NativeRegistry`, `NativeModule`)
//!
//! # Call Path
//!
//! ```text
//! NativeRegistry::call(namespace, name, args)
//!     -> resolve entry        (UndefinedFunction)
//!     -> check arity          (ArityMismatch)
//!     -> FromValue per arg    (TypeMismatch)
//!     -> native body          (panics become NativeFailure)
//!     -> IntoValue on result
//! ```

mod descriptor;
mod marshal;
mod registry;

pub use descriptor::{NativeDescriptor, CORE_NAMESPACE};
pub use marshal::{
    convert_arg, FromValue, IntoNativeFn, IntoValue, NativeFunction, NativeResult, RawArgs,
    RawNative, ANY_TYPE,
};
pub use registry::{
    global, install_global, DuplicatePolicy, NativeModule, NativeRegistry, NativeRegistryBuilder,
    RegistryError,
};

use std::sync::OnceLock;

static DIAGNOSTICS: OnceLock<bool> = OnceLock::new();

/// Install a `RUST_LOG`-filtered subscriber for native call diagnostics.
///
/// Returns whether this crate's subscriber is the active one. Without a
/// usable `RUST_LOG` directive, or when the host already installed a
/// subscriber, nothing is installed and the result is `false`. Only the
/// first call decides; later calls report the same answer.
///
/// `RUST_LOG=cathode_native=debug` shows registry setup,
/// `cathode_native=trace` adds one span per call.
pub fn init_tracing() -> bool {
    *DIAGNOSTICS.get_or_init(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return false;
        };
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).without_time())
            .try_init()
            .is_ok()
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
