#[allow(clippy::module_inception)]
pub mod registry;
pub mod builder;
pub mod entry;
pub mod key;


pub use builder::{RegistryBuilder, SharedBuilder};
pub use entry::{BoxedFactory, Candidate, FactoryEntry, Resolved};
pub use key::CapabilityKey;
pub use registry::FactoryRegistry;
