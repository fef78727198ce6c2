//! Named-operation registry shared by the formatter families.
//!
//! Each formatter instance owns one registry, copied from the family's
//! immutable default set at construction time and optionally extended (or
//! shadowed) through the family's builder. After construction the
//! registry is never mutated, so formatter instances are safe to share
//! across concurrent callers.

use std::collections::HashMap;
use std::sync::Arc;

use proteus_core::{BindError, BindResult};
use tracing::debug;

/// A name-to-operation table for one formatter family.
pub struct Registry<F: ?Sized> {
    family: &'static str,
    ops: HashMap<String, Arc<F>>,
}

impl<F: ?Sized> Registry<F> {
    /// Creates an empty registry for the given family.
    #[must_use]
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            ops: HashMap::new(),
        }
    }

    /// Returns the family name.
    #[must_use]
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Registers an operation, replacing any previous entry of that name.
    pub fn insert(&mut self, name: impl Into<String>, op: Arc<F>) {
        self.ops.insert(name.into(), op);
    }

    /// Resolves an operation by name.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::FormatterNotFound`] carrying both the family
    /// and the unresolved name.
    pub fn lookup(&self, name: &str) -> BindResult<Arc<F>> {
        self.ops
            .get(name)
            .cloned()
            .ok_or_else(|| BindError::formatter_not_found(self.family, name))
    }

    /// Returns the number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if no operations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Logs the finished registry; called once when a builder completes.
    pub(crate) fn seal(self) -> Self {
        debug!(
            family = self.family,
            operations = self.ops.len(),
            "formatter registry built"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Op = dyn Fn(&mut String) + Send + Sync;

    #[test]
    fn test_lookup_unknown_names_family_and_name() {
        let registry: Registry<Op> = Registry::new("string");
        // Operations are not Debug, so extract the error by pattern.
        match registry.lookup("nonexistent") {
            Err(BindError::FormatterNotFound { family, name }) => {
                assert_eq!(family, "string");
                assert_eq!(name, "nonexistent");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("lookup must fail"),
        }
    }

    #[test]
    fn test_insert_shadows_previous_entry() {
        let mut registry: Registry<Op> = Registry::new("string");
        registry.insert("op", Arc::new(|s: &mut String| s.push('a')));
        registry.insert("op", Arc::new(|s: &mut String| s.push('b')));
        assert_eq!(registry.len(), 1);

        let mut target = String::new();
        registry.lookup("op").unwrap()(&mut target);
        assert_eq!(target, "b");
    }
}
