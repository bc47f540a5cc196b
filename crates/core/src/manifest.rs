use crate::errors::CoreError;
use crate::registry::RegistryBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Declarative registration manifest.
///
/// Maps capability key names to ordered lists of implementation
/// identifiers, to be registered as deferred references during the
/// population phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub capabilities: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    /// Parse a manifest from YAML
    pub fn from_yaml(content: &str) -> Result<Self, CoreError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a manifest from JSON
    pub fn from_json(content: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Outcome of applying declarative registration sources
#[derive(Debug, Default)]
pub struct ManifestReport {
    /// Number of deferred references registered
    pub applied: usize,
    /// Capability names that matched no declared key
    pub unknown: Vec<String>,
}

/// Scans declarative registration sources into a registry builder
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn new() -> Self {
        Self
    }

    /// Scan a directory for `*.factories.yaml` and `*.factories.json`
    /// manifests and apply each to the builder. Files are visited in name
    /// order so that try-order stays deterministic across runs.
    pub fn load_dir(
        &self,
        dir: &Path,
        builder: &mut RegistryBuilder,
    ) -> Result<ManifestReport, CoreError> {
        let mut report = ManifestReport::default();
        if !dir.exists() {
            return Ok(report);
        }

        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "json")
                    && path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|s| s.ends_with(".factories"))
            })
            .collect();
        paths.sort();

        for path in paths {
            let content = std::fs::read_to_string(&path)?;
            let manifest = if path.extension().is_some_and(|ext| ext == "json") {
                Manifest::from_json(&content)?
            } else {
                Manifest::from_yaml(&content)?
            };
            debug!(manifest = %path.display(), "applying registration manifest");
            self.merge(&manifest, builder, &mut report)?;
        }

        Ok(report)
    }

    /// Apply a single manifest to the builder.
    ///
    /// Entries naming a capability with no declared key are skipped with a
    /// warning; empty implementation identifiers fail with
    /// `InvalidRegistration`.
    pub fn apply(
        &self,
        manifest: &Manifest,
        builder: &mut RegistryBuilder,
    ) -> Result<ManifestReport, CoreError> {
        let mut report = ManifestReport::default();
        self.merge(manifest, builder, &mut report)?;
        Ok(report)
    }

    fn merge(
        &self,
        manifest: &Manifest,
        builder: &mut RegistryBuilder,
        report: &mut ManifestReport,
    ) -> Result<(), CoreError> {
        for (capability, implementations) in &manifest.capabilities {
            let Some(key) = builder.key_named(capability) else {
                warn!(capability = %capability, "manifest names an undeclared capability; skipping");
                report.unknown.push(capability.clone());
                continue;
            };
            for implementation in implementations {
                builder.register_name(key, implementation.clone())?;
                report.applied += 1;
            }
        }
        Ok(())
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}
