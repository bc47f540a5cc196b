use std::any::Any;

/// Boxed zero-argument factory function type
pub type BoxedFactory = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// A registered factory for a capability
pub struct FactoryEntry {
    factory: BoxedFactory,
}

impl FactoryEntry {
    /// Wrap a boxed factory function
    pub fn new(factory: BoxedFactory) -> Self {
        Self { factory }
    }

    /// Invoke the factory, producing a fresh instance
    pub fn produce(&self) -> Box<dyn Any + Send + Sync> {
        (self.factory)()
    }
}

impl std::fmt::Debug for FactoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FactoryEntry").field(&"<factory>").finish()
    }
}

/// One implementation candidate for a capability, in try-order.
///
/// Factory candidates are not materialized by resolution; the caller decides
/// when (and whether) to invoke them.
#[derive(Debug)]
pub enum Candidate<'a> {
    /// A live factory registered during the population phase
    Factory(&'a FactoryEntry),
    /// A deferred reference: an implementation identified by name,
    /// to be loaded/instantiated later
    Deferred(&'a str),
}

impl Candidate<'_> {
    /// Check if this candidate is a deferred reference
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

/// A typed resolution result for a capability
#[derive(Debug)]
pub enum Resolved<T> {
    /// An instance materialized from a registered factory
    Instance(T),
    /// A deferred reference left for a later loading stage
    Deferred(String),
}

impl<T> Resolved<T> {
    /// Get the materialized instance, if any
    pub fn instance(self) -> Option<T> {
        match self {
            Self::Instance(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }

    /// Get the deferred identifier, if any
    pub fn deferred_name(&self) -> Option<&str> {
        match self {
            Self::Instance(_) => None,
            Self::Deferred(name) => Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_entry_produces_fresh_instances() {
        let entry = FactoryEntry::new(Box::new(|| Box::new(41u32)));
        let first = entry.produce().downcast::<u32>().unwrap();
        let second = entry.produce().downcast::<u32>().unwrap();
        assert_eq!(*first, 41);
        assert_eq!(*second, 41);
    }

    #[test]
    fn test_debug_does_not_expose_factory_internals() {
        let entry = FactoryEntry::new(Box::new(|| Box::new(())));
        assert_eq!(format!("{:?}", entry), "FactoryEntry(\"<factory>\")");
    }

    #[test]
    fn test_resolved_accessors() {
        let materialized: Resolved<u32> = Resolved::Instance(7);
        assert_eq!(materialized.instance(), Some(7));

        let deferred: Resolved<u32> = Resolved::Deferred("pkg.Cat".to_string());
        assert_eq!(deferred.deferred_name(), Some("pkg.Cat"));
        assert!(deferred.instance().is_none());
    }
}
