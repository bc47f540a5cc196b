use crate::errors::CoreError;
use crate::registry::entry::{Candidate, FactoryEntry, Resolved};
use crate::registry::key::CapabilityKey;
use std::collections::HashMap;
use tracing::info;

/// The frozen, read-only factory registry.
///
/// Holds the two parallel multi-maps of the population phase: `factories`
/// (live zero-argument factories per capability) and `names` (deferred
/// implementation references per capability). There is no mutation API;
/// immutability after freeze is a property of the type, not a flag.
#[derive(Debug)]
pub struct FactoryRegistry {
    factories: HashMap<CapabilityKey, Vec<FactoryEntry>>,
    names: HashMap<CapabilityKey, Vec<String>>,
    keys: Vec<CapabilityKey>,
}

impl FactoryRegistry {
    pub(crate) fn from_parts(
        factories: HashMap<CapabilityKey, Vec<FactoryEntry>>,
        names: HashMap<CapabilityKey, Vec<String>>,
        keys: Vec<CapabilityKey>,
    ) -> Self {
        info!(
            keys = keys.len(),
            "factory registry frozen; population phase over"
        );
        Self {
            factories,
            names,
            keys,
        }
    }

    /// Resolve all implementation candidates for a capability, in try-order:
    /// factory entries first, then deferred references.
    ///
    /// Factories are not invoked here. An unregistered key resolves to an
    /// empty sequence, never an error.
    pub fn resolve(&self, key: CapabilityKey) -> impl Iterator<Item = Candidate<'_>> {
        let factories = self
            .factories
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let names = self.names.get(&key).map(Vec::as_slice).unwrap_or_default();

        factories
            .iter()
            .map(Candidate::Factory)
            .chain(names.iter().map(|n| Candidate::Deferred(n.as_str())))
    }

    /// Resolve capability type `T`, materializing every factory candidate.
    ///
    /// Deferred references are passed through untouched. Fails with
    /// `TypeMismatch` when a factory produces a value that is not a `T`.
    pub fn resolve_typed<T: Send + Sync + 'static>(&self) -> Result<Vec<Resolved<T>>, CoreError> {
        let key = CapabilityKey::of::<T>();
        self.resolve(key)
            .map(|candidate| match candidate {
                Candidate::Factory(entry) => entry
                    .produce()
                    .downcast::<T>()
                    .map(|boxed| Resolved::Instance(*boxed))
                    .map_err(|_| CoreError::type_mismatch(key.type_name())),
                Candidate::Deferred(name) => Ok(Resolved::Deferred(name.to_string())),
            })
            .collect()
    }

    /// Iterate over all registered capability keys.
    ///
    /// The iterator is lazy, finite and restartable; each key appears exactly
    /// once. Order across keys is first-registration order, which callers
    /// must not rely on.
    pub fn keys(&self) -> impl Iterator<Item = CapabilityKey> + '_ {
        self.keys.iter().copied()
    }

    /// Look a key up by its recorded type name
    pub fn key_named(&self, name: &str) -> Option<CapabilityKey> {
        self.keys.iter().copied().find(|k| k.type_name() == name)
    }

    /// Check if a capability key is known to the registry.
    ///
    /// Declared-but-empty keys count: this agrees with `keys()` and `len()`,
    /// and "no implementations" remains a valid terminal state for a known
    /// key.
    pub fn contains(&self, key: CapabilityKey) -> bool {
        self.keys.contains(&key)
    }

    /// The factory entries registered for a capability, in try-order
    pub fn factory_entries(&self, key: CapabilityKey) -> &[FactoryEntry] {
        self.factories
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The deferred implementation names registered for a capability, in try-order
    pub fn deferred_names(&self, key: CapabilityKey) -> &[String] {
        self.names.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct capability keys in the registry
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the registry holds no keys at all
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builder::RegistryBuilder;

    #[test]
    fn test_unregistered_key_resolves_empty() {
        let registry = RegistryBuilder::new().freeze();
        let key = CapabilityKey::of::<String>();

        assert_eq!(registry.resolve(key).count(), 0);
        assert!(!registry.contains(key));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolution_does_not_invoke_factories() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut builder = RegistryBuilder::new();
        builder.register::<u32, _>(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            7
        });
        let registry = builder.freeze();

        let candidates: Vec<_> = registry.resolve(CapabilityKey::of::<u32>()).collect();
        assert_eq!(candidates.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let resolved = registry.resolve_typed::<u32>().unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_typed_resolution_materializes_in_order() {
        let mut builder = RegistryBuilder::new();
        builder.register::<u32, _>(|| 1);
        builder.register::<u32, _>(|| 2);
        let registry = builder.freeze();

        let values: Vec<u32> = registry
            .resolve_typed::<u32>()
            .unwrap()
            .into_iter()
            .filter_map(Resolved::instance)
            .collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_type_mismatch_surfaces_as_error() {
        let mut builder = RegistryBuilder::new();
        // Dynamic registration can lie about the produced type.
        builder.register_factory(CapabilityKey::of::<u32>(), Box::new(|| Box::new("oops")));
        let registry = builder.freeze();

        let err = registry.resolve_typed::<u32>().unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_contains_agrees_with_keys_for_declared_keys() {
        let mut builder = RegistryBuilder::new();
        let declared = builder.declare_capability::<String>();
        let registry = builder.freeze();

        assert!(registry.contains(declared));
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains(CapabilityKey::of::<u32>()));
    }

    #[test]
    fn test_keys_iterator_is_restartable() {
        let mut builder = RegistryBuilder::new();
        builder.register::<u32, _>(|| 1);
        builder.register::<String, _>(|| "a".to_string());
        let registry = builder.freeze();

        assert_eq!(registry.keys().count(), 2);
        assert_eq!(registry.keys().count(), 2);
    }
}
