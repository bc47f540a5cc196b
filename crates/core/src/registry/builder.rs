use crate::errors::CoreError;
use crate::registry::entry::{BoxedFactory, FactoryEntry};
use crate::registry::key::CapabilityKey;
use crate::registry::registry::FactoryRegistry;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Builder for populating a factory registry.
///
/// Registration is append-only: a second registration for the same key never
/// overwrites an earlier one, it lands behind it in try-order. The builder is
/// the only mutable phase of the registry lifecycle; `freeze` ends it.
pub struct RegistryBuilder {
    factories: HashMap<CapabilityKey, Vec<FactoryEntry>>,
    names: HashMap<CapabilityKey, Vec<String>>,
    // First-registration order of keys, one entry per distinct key.
    order: Vec<CapabilityKey>,
}

impl RegistryBuilder {
    /// Create a new, empty registry builder
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            names: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Declare a capability key without registering any implementation.
    ///
    /// Declared keys are visible to `key_named` and survive into the frozen
    /// registry even when no implementation is ever registered for them
    /// ("no implementations" is a valid terminal state).
    pub fn declare(&mut self, key: CapabilityKey) {
        self.track(key);
    }

    /// Declare the capability key for type `T` and return it
    pub fn declare_capability<T: ?Sized + 'static>(&mut self) -> CapabilityKey {
        let key = CapabilityKey::of::<T>();
        self.track(key);
        key
    }

    /// Register a typed factory for capability type `T`
    pub fn register<T, F>(&mut self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let key = CapabilityKey::of::<T>();
        self.register_factory(
            key,
            Box::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>),
        );
    }

    /// Register a boxed factory for the given capability key
    pub fn register_factory(&mut self, key: CapabilityKey, factory: BoxedFactory) {
        self.track(key);
        self.factories
            .entry(key)
            .or_default()
            .push(FactoryEntry::new(factory));
        debug!(capability = %key, "registered factory");
    }

    /// Register a deferred implementation reference by name.
    ///
    /// Fails with `InvalidRegistration` when the identifier is empty or
    /// blank; the registry is left unchanged in that case.
    pub fn register_name(
        &mut self,
        key: CapabilityKey,
        class_name: impl Into<String>,
    ) -> Result<(), CoreError> {
        let class_name = class_name.into();
        if class_name.trim().is_empty() {
            return Err(CoreError::invalid_registration(format!(
                "empty implementation identifier for capability '{}'",
                key
            )));
        }

        self.track(key);
        self.names.entry(key).or_default().push(class_name);
        debug!(capability = %key, "registered deferred name");
        Ok(())
    }

    /// Look a declared key up by its recorded type name
    pub fn key_named(&self, name: &str) -> Option<CapabilityKey> {
        self.order.iter().copied().find(|k| k.type_name() == name)
    }

    /// Number of distinct capability keys seen so far
    pub fn key_count(&self) -> usize {
        self.order.len()
    }

    /// End the population phase, producing the immutable registry
    pub fn freeze(self) -> FactoryRegistry {
        FactoryRegistry::from_parts(self.factories, self.names, self.order)
    }

    fn track(&mut self, key: CapabilityKey) {
        if !self.order.contains(&key) {
            self.order.push(key);
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutex-wrapped builder handle for parallel scanning phases.
///
/// Appends are serialized through the lock, preserving per-key
/// insertion-order determinism; reads never overlap writes because
/// consumption only starts after `freeze`.
#[derive(Clone)]
pub struct SharedBuilder {
    inner: Arc<Mutex<RegistryBuilder>>,
}

impl SharedBuilder {
    /// Wrap a registry builder for shared use
    pub fn new(builder: RegistryBuilder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(builder)),
        }
    }

    /// Register a boxed factory for the given capability key
    pub fn register_factory(
        &self,
        key: CapabilityKey,
        factory: BoxedFactory,
    ) -> Result<(), CoreError> {
        let mut builder = self.lock()?;
        builder.register_factory(key, factory);
        Ok(())
    }

    /// Register a deferred implementation reference by name
    pub fn register_name(
        &self,
        key: CapabilityKey,
        class_name: impl Into<String>,
    ) -> Result<(), CoreError> {
        let mut builder = self.lock()?;
        builder.register_name(key, class_name)
    }

    /// Run a closure against the underlying builder
    pub fn with<R>(&self, f: impl FnOnce(&mut RegistryBuilder) -> R) -> Result<R, CoreError> {
        let mut builder = self.lock()?;
        Ok(f(&mut builder))
    }

    /// End the population phase.
    ///
    /// Fails with a lock error when other handles to the builder are still
    /// alive: freezing while a scanner could still append would break the
    /// two-phase discipline.
    pub fn freeze(self) -> Result<FactoryRegistry, CoreError> {
        let mutex = Arc::try_unwrap(self.inner)
            .map_err(|_| CoreError::lock_error("shared_builder: outstanding handles"))?;
        let builder = mutex
            .into_inner()
            .map_err(|_| CoreError::lock_error("shared_builder"))?;
        Ok(builder.freeze())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RegistryBuilder>, CoreError> {
        self.inner
            .lock()
            .map_err(|_| CoreError::lock_error("shared_builder"))
    }
}
