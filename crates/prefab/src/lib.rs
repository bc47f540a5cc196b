//! prefab: a build-time capability/factory registry.
//!
//! The registry records, per capability type, an ordered list of live
//! factory functions and deferred implementation names. Population happens
//! once, during a scanning phase; `freeze` ends it and consumption is
//! read-only from there.
//!
//! The `buildtools` cargo feature enables the optional build-pipeline
//! module (`prefab-buildtools`). When it is not enabled the registry still
//! works in full; only the aliasing/codegen surface is absent.

pub use prefab_core::*;

#[cfg(feature = "buildtools")]
pub use prefab_buildtools as buildtools;

/// Check whether the optional buildtools module was compiled in
pub fn buildtools_compiled_in() -> bool {
    cfg!(feature = "buildtools")
}

/// Detect buildtools availability for this build.
///
/// Combines the compiled-in fact with the `PREFAB_BUILDTOOLS` environment
/// override; see [`BuildtoolsGate::detect`].
pub fn detect_buildtools() -> BuildtoolsGate {
    BuildtoolsGate::detect(buildtools_compiled_in())
}
