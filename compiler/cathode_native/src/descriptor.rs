//! Native function descriptors.
//!
//! A descriptor names a native function for script lookup. Parameter labels
//! are for introspection only; argument types are checked structurally by
//! the marshalling layer.

use std::fmt;

/// Namespace used when a descriptor does not name one.
pub const CORE_NAMESPACE: &str = "core";

/// Script-visible identity of a native function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NativeDescriptor {
    name: String,
    namespace: String,
    params: Vec<String>,
}

impl NativeDescriptor {
    /// Descriptor in the `core` namespace with no parameter labels.
    pub fn new(name: impl Into<String>) -> Self {
        NativeDescriptor {
            name: name.into(),
            namespace: CORE_NAMESPACE.to_string(),
            params: Vec::new(),
        }
    }

    /// Descriptor in the `core` namespace with parameter labels.
    pub fn with_params<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NativeDescriptor {
            params: params.into_iter().map(Into::into).collect(),
            ..Self::new(name)
        }
    }

    /// Move the descriptor into `namespace`.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Parameter labels, empty when none were given.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// `namespace.name`, as used in diagnostics.
    pub fn qualified_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NativeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests;
