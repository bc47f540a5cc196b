use prefab_core::{BuildtoolsGate, FactoryRegistry};
use tracing::{debug, info};

/// Read-only view of one capability key in a frozen registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySnapshot {
    /// Recorded type name of the capability key
    pub capability: String,
    /// How many live factories are registered, in try-order ahead of the
    /// deferred names. Factories cannot be carried into generated source;
    /// only their count survives the capture.
    pub factory_count: usize,
    /// Deferred implementation names, in try-order
    pub deferred: Vec<String>,
}

/// Deterministic capture of the two registry fields (`factories`, `names`),
/// keyed and sorted by capability type name.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: Vec<KeySnapshot>,
}

impl Snapshot {
    fn capture(registry: &FactoryRegistry) -> Self {
        let mut entries: Vec<KeySnapshot> = registry
            .keys()
            .map(|key| KeySnapshot {
                capability: key.type_name().to_string(),
                factory_count: registry.factory_entries(key).len(),
                deferred: registry.deferred_names(key).to_vec(),
            })
            .collect();
        entries.sort_by(|a, b| a.capability.cmp(&b.capability));
        Self { entries }
    }

    /// Iterate over per-key views, sorted by capability name
    pub fn entries(&self) -> impl Iterator<Item = &KeySnapshot> {
        self.entries.iter()
    }

    /// The `factories` field view: capability name and factory count per key
    pub fn factories(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|e| (e.capability.as_str(), e.factory_count))
    }

    /// The `names` field view: capability name and deferred names per key
    pub fn names(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.capability.as_str(), e.deferred.as_slice()))
    }

    /// Number of captured capability keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the capture holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Aliased access to the static factory maps of a frozen registry.
///
/// The build pipeline never touches the registry directly; it goes through
/// this capture, which only exists when the buildtools gate reports the
/// optional dependency present. When the gate reports it absent the capture
/// is `Disabled` and no registry path is exercised.
#[derive(Debug)]
pub enum StaticFactories {
    /// The gate reported the optional dependency present
    Captured(Snapshot),
    /// The gate reported the optional dependency absent; inert.
    Disabled { reason: String },
}

impl StaticFactories {
    /// Capture the registry's `factories`/`names` fields, subject to the gate
    pub fn capture(registry: &FactoryRegistry, gate: &BuildtoolsGate) -> Self {
        match gate.availability() {
            prefab_core::Availability::Absent { reason } => {
                debug!(reason = %reason, "buildtools absent; skipping registry capture");
                Self::Disabled {
                    reason: reason.clone(),
                }
            }
            prefab_core::Availability::Present { version } => {
                let snapshot = Snapshot::capture(registry);
                info!(
                    buildtools_version = %version,
                    keys = snapshot.len(),
                    "captured static factory maps"
                );
                Self::Captured(snapshot)
            }
        }
    }

    /// Check if the capture was disabled by the gate
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled { .. })
    }

    /// Get the captured snapshot, if the gate allowed one
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Self::Captured(snapshot) => Some(snapshot),
            Self::Disabled { .. } => None,
        }
    }
}
