//! Shared mutable containers: arrays and structs.
//!
//! Both types are cheap handles around an `Arc<RwLock<_>>`. Cloning a handle
//! shares the container; every holder observes mutations made through any
//! other holder. Locks are held only for the duration of a single accessor
//! call, and no accessor hands out a guard.
//!
//! A container may hold itself (`a.push(a.clone())`). Equality and rendering
//! carry the set of containers already open further up the stack and stop
//! when they meet one again. Nested traversal takes read locks with
//! `read_recursive` because the same container can be read twice.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Value;

/// Address of a shared container, for cycle detection.
pub(super) type ContainerId = *const ();

/// Container pairs under comparison further up the stack.
pub(super) type ActivePairs = Vec<(ContainerId, ContainerId)>;

// ArrayValue

/// Ordered, shared, mutable sequence of values.
#[derive(Clone, Default)]
pub struct ArrayValue(Arc<RwLock<Vec<Value>>>);

impl ArrayValue {
    /// Create an array that takes ownership of `items`.
    pub fn new(items: Vec<Value>) -> Self {
        ArrayValue(Arc::new(RwLock::new(items)))
    }

    /// Create an array by copying `items`.
    pub fn from_slice(items: &[Value]) -> Self {
        Self::new(items.to_vec())
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Get a clone of the element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Replace the element at `index`, returning the previous element.
    ///
    /// Returns `None` (and leaves the array untouched) when `index` is out
    /// of bounds.
    pub fn set(&self, index: usize, value: Value) -> Option<Value> {
        let mut items = self.0.write();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    /// Append an element.
    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Remove and return the last element.
    pub fn pop(&self) -> Option<Value> {
        self.0.write().pop()
    }

    /// Copy the current contents out of the shared container.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Run `f` with read access to the elements.
    ///
    /// `f` must not mutate this same array; doing so would deadlock.
    pub fn with_items<R>(&self, f: impl FnOnce(&[Value]) -> R) -> R {
        f(&self.0.read())
    }

    /// Check whether two handles refer to the same container.
    pub fn ptr_eq(&self, other: &ArrayValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(super) fn id(&self) -> ContainerId {
        Arc::as_ptr(&self.0).cast()
    }

    /// Element-wise equality under `Value::equals`.
    ///
    /// A pair already in `active` compares equal: both sides loop back the
    /// same way, and any difference shows up elsewhere in the traversal.
    pub(super) fn content_equals(&self, other: &ArrayValue, active: &mut ActivePairs) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let pair = (self.id(), other.id());
        if active.contains(&pair) {
            return true;
        }
        active.push(pair);
        let equal = {
            let (a, b) = (self.0.read_recursive(), other.0.read_recursive());
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.equals_within(y, active))
        };
        active.pop();
        equal
    }

    /// `{ a, b }`, `{ }` when empty, `{ ... }` for an array that is already
    /// being rendered.
    pub(super) fn render_within(
        &self,
        f: &mut fmt::Formatter<'_>,
        open: &mut Vec<ContainerId>,
    ) -> fmt::Result {
        let id = self.id();
        if open.contains(&id) {
            return f.write_str("{ ... }");
        }
        open.push(id);
        let result = render_items(&self.0.read_recursive(), f, open);
        open.pop();
        result
    }
}

fn render_items(
    items: &[Value],
    f: &mut fmt::Formatter<'_>,
    open: &mut Vec<ContainerId>,
) -> fmt::Result {
    f.write_str("{ ")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt_within(f, open)?;
    }
    if !items.is_empty() {
        f.write_str(" ")?;
    }
    f.write_str("}")
}

impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.read().iter()).finish()
    }
}

// StructValue

/// Shared, mutable map from field name to value.
///
/// Field order is not significant.
#[derive(Clone, Default)]
pub struct StructValue(Arc<RwLock<FxHashMap<String, Value>>>);

impl StructValue {
    /// Create a struct with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a struct from name/value pairs. Later duplicates win.
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let map = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        StructValue(Arc::new(RwLock::new(map)))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Get a clone of a field value.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.0.read().get(field).cloned()
    }

    /// Check whether a field exists.
    pub fn contains(&self, field: &str) -> bool {
        self.0.read().contains_key(field)
    }

    /// Set a field, returning its previous value.
    pub fn set(&self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.write().insert(field.into(), value)
    }

    /// Remove a field, returning its value.
    pub fn remove(&self, field: &str) -> Option<Value> {
        self.0.write().remove(field)
    }

    /// Field names, sorted for deterministic output.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether two handles refer to the same container.
    pub fn ptr_eq(&self, other: &StructValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(super) fn id(&self) -> ContainerId {
        Arc::as_ptr(&self.0).cast()
    }

    /// Same key set with pairwise-equal values. Cycles are handled as in
    /// `ArrayValue::content_equals`.
    pub(super) fn content_equals(&self, other: &StructValue, active: &mut ActivePairs) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let pair = (self.id(), other.id());
        if active.contains(&pair) {
            return true;
        }
        active.push(pair);
        let equal = {
            let (a, b) = (self.0.read_recursive(), other.0.read_recursive());
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(k, v)| b.get(k).is_some_and(|bv| v.equals_within(bv, active)))
        };
        active.pop();
        equal
    }
}

impl fmt::Debug for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.0.read();
        let mut names: Vec<&String> = fields.keys().collect();
        names.sort();
        let mut map = f.debug_map();
        for name in names {
            map.entry(name, &fields[name]);
        }
        map.finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
