pub mod codegen;
pub mod snapshot;
pub mod writer;

pub use codegen::RegistrationGenerator;
pub use snapshot::{KeySnapshot, Snapshot, StaticFactories};
pub use writer::CodeWriter;
