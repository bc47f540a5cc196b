pub mod errors;
pub mod gate;
pub mod manifest;
pub mod registry;

// Re-export key types for convenience (specific exports to avoid ambiguity)
pub use errors::CoreError;
pub use gate::{Availability, BuildtoolsGate, BUILDTOOLS_ENV};
pub use manifest::{Manifest, ManifestLoader, ManifestReport};
pub use registry::{
    BoxedFactory, Candidate, CapabilityKey, FactoryEntry, FactoryRegistry, RegistryBuilder,
    Resolved, SharedBuilder,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Toolkit information
pub const TOOLKIT_NAME: &str = "prefab";
