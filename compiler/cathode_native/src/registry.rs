//! Native function registry.
//!
//! Functions are registered through a `NativeRegistryBuilder`, one call per
//! function or one `NativeModule` at a time, in a fixed order. `build()`
//! freezes the result into an immutable `NativeRegistry` that resolves
//! (namespace, name) pairs and drives the marshalling boundary.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use cathode_value::{native_failure, undefined_function, wrong_arg_count, EvalResult, Value};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::descriptor::NativeDescriptor;
use crate::marshal::{IntoNativeFn, NativeFunction};

/// Registration-time failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("native function `{0}` is already registered")]
    Duplicate(String),

    #[error("native function `{function}` has {labels} parameter labels but takes {arity} arguments")]
    ParamCountMismatch {
        function: String,
        labels: usize,
        arity: usize,
    },

    #[error("a global native registry is already installed")]
    AlreadyInstalled,
}

/// What to do when a (namespace, name) pair is registered twice.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with `RegistryError::Duplicate`.
    #[default]
    Reject,
    /// Keep the registration slot, swap in the new function.
    Replace,
}

/// A group of native functions registered together.
pub trait NativeModule {
    /// Namespace the module registers into.
    fn namespace(&self) -> &str;

    fn register(&self, builder: &mut NativeRegistryBuilder) -> Result<(), RegistryError>;
}

struct NativeEntry {
    descriptor: NativeDescriptor,
    function: Box<dyn NativeFunction>,
}

/// namespace -> name -> entry index
type NativeIndex = FxHashMap<String, FxHashMap<String, usize>>;

/// Collects native functions before the registry is frozen.
pub struct NativeRegistryBuilder {
    entries: Vec<NativeEntry>,
    index: NativeIndex,
    duplicate_policy: DuplicatePolicy,
    catch_panics: bool,
}

impl Default for NativeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeRegistryBuilder {
    pub fn new() -> Self {
        NativeRegistryBuilder {
            entries: Vec::new(),
            index: FxHashMap::default(),
            duplicate_policy: DuplicatePolicy::Reject,
            catch_panics: true,
        }
    }

    #[must_use]
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Whether panics in native functions become `NativeFailure` errors.
    ///
    /// Defaults to `true`. With `false` a panic unwinds through `call`.
    #[must_use]
    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }

    /// Register a typed closure or `RawNative`.
    pub fn register<Args>(
        &mut self,
        descriptor: NativeDescriptor,
        function: impl IntoNativeFn<Args>,
    ) -> Result<&mut Self, RegistryError> {
        self.register_boxed(descriptor, function.into_native())
    }

    /// Register an already type-erased function.
    pub fn register_boxed(
        &mut self,
        descriptor: NativeDescriptor,
        function: Box<dyn NativeFunction>,
    ) -> Result<&mut Self, RegistryError> {
        let arity = function.arity();
        let labels = descriptor.params().len();
        if labels != 0 && labels != arity {
            return Err(RegistryError::ParamCountMismatch {
                function: descriptor.qualified_name(),
                labels,
                arity,
            });
        }

        let existing = self
            .index
            .get(descriptor.namespace())
            .and_then(|names| names.get(descriptor.name()))
            .copied();

        let entry = NativeEntry {
            descriptor,
            function,
        };
        match (existing, self.duplicate_policy) {
            (Some(_), DuplicatePolicy::Reject) => {
                return Err(RegistryError::Duplicate(entry.descriptor.qualified_name()));
            }
            (Some(slot), DuplicatePolicy::Replace) => {
                debug!(
                    namespace = entry.descriptor.namespace(),
                    name = entry.descriptor.name(),
                    arity,
                    "replacing native function"
                );
                self.entries[slot] = entry;
            }
            (None, _) => {
                debug!(
                    namespace = entry.descriptor.namespace(),
                    name = entry.descriptor.name(),
                    arity,
                    "registering native function"
                );
                let slot = self.entries.len();
                self.index
                    .entry(entry.descriptor.namespace().to_string())
                    .or_default()
                    .insert(entry.descriptor.name().to_string(), slot);
                self.entries.push(entry);
            }
        }
        Ok(self)
    }

    /// Register every function of `module`.
    pub fn register_module(
        &mut self,
        module: &dyn NativeModule,
    ) -> Result<&mut Self, RegistryError> {
        debug!(namespace = module.namespace(), "registering native module");
        module.register(self)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the registrations.
    pub fn build(self) -> NativeRegistry {
        debug!(functions = self.entries.len(), "native registry built");
        NativeRegistry {
            entries: self.entries,
            index: self.index,
            catch_panics: self.catch_panics,
        }
    }
}

/// Immutable table of native functions, keyed by (namespace, name).
pub struct NativeRegistry {
    entries: Vec<NativeEntry>,
    index: NativeIndex,
    catch_panics: bool,
}

impl NativeRegistry {
    pub fn builder() -> NativeRegistryBuilder {
        NativeRegistryBuilder::new()
    }

    fn entry(&self, namespace: &str, name: &str) -> Option<&NativeEntry> {
        let slot = *self.index.get(namespace)?.get(name)?;
        self.entries.get(slot)
    }

    /// Descriptor of a registered function.
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<&NativeDescriptor> {
        self.entry(namespace, name).map(|entry| &entry.descriptor)
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.entry(namespace, name).is_some()
    }

    /// Arity of a registered function.
    pub fn arity(&self, namespace: &str, name: &str) -> Option<usize> {
        self.entry(namespace, name)
            .map(|entry| entry.function.arity())
    }

    /// Expected argument type names of a registered function.
    pub fn param_types(&self, namespace: &str, name: &str) -> Option<Vec<&'static str>> {
        self.entry(namespace, name)
            .map(|entry| entry.function.param_types())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &NativeDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Distinct namespaces in order of first registration.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.index.len());
        for entry in &self.entries {
            let namespace = entry.descriptor.namespace();
            if !seen.contains(&namespace) {
                seen.push(namespace);
            }
        }
        seen
    }

    /// Call a native function with script arguments.
    ///
    /// Resolution, arity and argument-type failures, errors returned by the
    /// function body, and (unless disabled) panics all come back as `Err`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(namespace = %namespace, name = %name, argc = args.len())
    )]
    pub fn call(&self, namespace: &str, name: &str, args: &[Value]) -> EvalResult {
        let entry = self
            .entry(namespace, name)
            .ok_or_else(|| undefined_function(namespace, name))?;
        let arity = entry.function.arity();
        if args.len() != arity {
            return Err(wrong_arg_count(
                &entry.descriptor.qualified_name(),
                arity,
                args.len(),
            ));
        }

        let result = if self.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| entry.function.invoke(args))).unwrap_or_else(
                |payload| {
                    let message = panic_message(payload.as_ref());
                    warn!(function = %entry.descriptor, %message, "native function panicked");
                    Err(native_failure(&entry.descriptor.qualified_name(), message))
                },
            )
        } else {
            entry.function.invoke(args)
        };
        result.map_err(|err| err.with_note(format!("in call to {}", entry.descriptor)))
    }
}

impl std::fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRegistry")
            .field("functions", &self.descriptors().collect::<Vec<_>>())
            .field("catch_panics", &self.catch_panics)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

static GLOBAL_REGISTRY: OnceLock<NativeRegistry> = OnceLock::new();

/// Install `registry` as the process-wide registry.
///
/// Only the first install succeeds.
pub fn install_global(registry: NativeRegistry) -> Result<&'static NativeRegistry, RegistryError> {
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    GLOBAL_REGISTRY.get().ok_or(RegistryError::AlreadyInstalled)
}

/// The process-wide registry, if one was installed.
pub fn global() -> Option<&'static NativeRegistry> {
    GLOBAL_REGISTRY.get()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
