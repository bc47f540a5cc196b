use std::any::TypeId;
use std::hash::{Hash, Hasher};

/// Identifies a capability type for which implementations are sought.
///
/// Equality and hashing go by the identity of the represented type, never
/// by the recorded display name.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl CapabilityKey {
    /// Create the key for capability type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Get the identity of the represented type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the recorded type name (diagnostics and manifest lookup)
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for CapabilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name)
    }
}
