//! Error types for safeinteract
//!
//! Construction-time and configuration failures raised by the crate itself.
//! Failures produced by interaction actions stay in the caller's own error
//! type and are never converted into these variants.

use thiserror::Error;

/// Main error type for the interception pipeline
#[derive(Error, Debug)]
pub enum InteractError {
    /// A concrete type was requested where a capability was expected
    #[error("'{type_name}' is not a capability; upcast the target to the capability it should expose")]
    InvalidCapability { type_name: String },

    /// Discovery found nothing to expose
    #[error("No capabilities discovered for '{type_name}'")]
    EmptyCapabilitySet { type_name: String },

    /// Method called on a proxy whose capability set does not cover it
    #[error("Capability '{capability}' is not exposed by this proxy (called '{method}')")]
    CapabilityNotExposed { capability: String, method: String },

    /// Registry lookup failed
    #[error("No interactor registered for context type '{context}'")]
    NoInteractor { context: String },

    /// An erased interactor reported success without a successful action run
    #[error("Interactor completed without producing an action result")]
    MissingActionResult,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, InteractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_capability_display() {
        let err = InteractError::InvalidCapability {
            type_name: "Button".to_string(),
        };
        assert!(err.to_string().contains("Button"));
        assert!(err.to_string().contains("not a capability"));
    }

    #[test]
    fn test_not_exposed_display() {
        let err = InteractError::CapabilityNotExposed {
            capability: "TextField".to_string(),
            method: "type_text".to_string(),
        };
        assert!(err.to_string().contains("TextField"));
        assert!(err.to_string().contains("type_text"));
    }
}
