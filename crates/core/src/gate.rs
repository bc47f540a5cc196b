use tracing::debug;

/// Environment variable overriding buildtools presence detection.
///
/// Values `0`, `false` or `off` mark the optional dependency absent even
/// when it was compiled in; any other value marks it present.
pub const BUILDTOOLS_ENV: &str = "PREFAB_BUILDTOOLS";

/// Outcome of optional-dependency detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The buildtools module is on hand
    Present { version: String },
    /// The buildtools module is missing; the aliasing feature is inert.
    /// This is a configuration branch, not an error.
    Absent { reason: String },
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present { version } => write!(f, "present (version {})", version),
            Self::Absent { reason } => write!(f, "absent ({})", reason),
        }
    }
}

/// Configuration-time gate for the optional buildtools dependency.
///
/// Evaluated once, before the build pipeline runs; everything downstream
/// branches on the recorded availability instead of re-probing.
#[derive(Debug, Clone)]
pub struct BuildtoolsGate {
    availability: Availability,
}

impl BuildtoolsGate {
    /// Detect availability from the environment override and the
    /// compiled-in flag. The override wins.
    pub fn detect(compiled_in: bool) -> Self {
        let gate = match std::env::var(BUILDTOOLS_ENV) {
            Ok(value) if is_falsy(&value) => Self::absent(format!(
                "disabled via {}={}",
                BUILDTOOLS_ENV, value
            )),
            Ok(_) => Self::present(crate::VERSION),
            Err(_) if compiled_in => Self::present(crate::VERSION),
            Err(_) => Self::absent("buildtools feature not enabled"),
        };
        debug!(availability = %gate.availability, "buildtools gate evaluated");
        gate
    }

    /// Create a gate that reports the dependency present
    pub fn present(version: impl Into<String>) -> Self {
        Self {
            availability: Availability::Present {
                version: version.into(),
            },
        }
    }

    /// Create a gate that reports the dependency absent
    pub fn absent(reason: impl Into<String>) -> Self {
        Self {
            availability: Availability::Absent {
                reason: reason.into(),
            },
        }
    }

    /// Check whether the buildtools module is available
    pub fn is_present(&self) -> bool {
        matches!(self.availability, Availability::Present { .. })
    }

    /// Get the recorded detection outcome
    pub fn availability(&self) -> &Availability {
        &self.availability
    }
}

fn is_falsy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off")
}
