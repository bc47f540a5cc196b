use thiserror::Error;

/// Core error type for the prefab toolkit
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid registration: {message}")]
    InvalidRegistration { message: String },

    #[error("Factory for capability '{capability}' produced a value of the wrong type")]
    TypeMismatch { capability: String },

    #[error("Lock error on resource: {resource}")]
    LockError { resource: String },

    #[error("Template error: {message}")]
    Template { message: String },
}

impl CoreError {
    /// Create a new invalid-registration error
    pub fn invalid_registration(message: impl Into<String>) -> Self {
        Self::InvalidRegistration {
            message: message.into(),
        }
    }

    /// Create a new type-mismatch error
    pub fn type_mismatch(capability: impl Into<String>) -> Self {
        Self::TypeMismatch {
            capability: capability.into(),
        }
    }

    /// Create a new lock error
    pub fn lock_error(resource: impl Into<String>) -> Self {
        Self::LockError {
            resource: resource.into(),
        }
    }

    /// Create a new template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Check if the error is an invalid-registration error
    pub fn is_invalid_registration(&self) -> bool {
        matches!(self, Self::InvalidRegistration { .. })
    }

    /// Check if the error is a type-mismatch error
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}
