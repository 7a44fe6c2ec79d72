//! Error types for resonance-core.

use thiserror::Error;

use crate::types::{ConnectionKey, FieldId};

/// Top-level error type for the resonance engine.
///
/// Non-convergence of the stabilization loop and emergence fallbacks are
/// reported outcomes, not errors, so they have no variant here.
#[derive(Debug, Error)]
pub enum ResonanceError {
    /// A configuration value is outside its valid range.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfig { field: String, message: String },

    /// A field identifier is not present in the network.
    #[error("Unknown field: {id}")]
    UnknownField { id: FieldId },

    /// A connection key is not present in the network.
    #[error("Unknown connection: {key}")]
    UnknownConnection { key: ConnectionKey },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A call argument is invalid.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },
}

impl ResonanceError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Whether this error refers to an identifier missing from the network.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. } | Self::UnknownConnection { .. }
        )
    }
}

impl From<::config::ConfigError> for ResonanceError {
    fn from(err: ::config::ConfigError) -> Self {
        ResonanceError::ConfigError(err.to_string())
    }
}

/// Result type alias for resonance operations.
pub type ResonanceResult<T> = Result<T, ResonanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = FieldId::nil();
        let errors: Vec<ResonanceError> = vec![
            ResonanceError::invalid_config("network.density", "must be within [0, 1]"),
            ResonanceError::UnknownField { id },
            ResonanceError::UnknownConnection {
                key: ConnectionKey::new(id, id),
            },
            ResonanceError::ConfigError("missing file".into()),
            ResonanceError::invalid_parameter("dt must be positive"),
        ];

        let expected_substrings = [
            "network.density",
            "Unknown field",
            "Unknown connection",
            "missing file",
            "dt must be positive",
        ];

        for (err, expected) in errors.iter().zip(expected_substrings.iter()) {
            let display = err.to_string();
            assert!(
                display.contains(expected),
                "Display for {:?} should contain '{}', got: {}",
                err,
                expected,
                display
            );
        }

        println!("[PASS] test_error_display - all variants render their context");
    }

    #[test]
    fn test_not_found_classification() {
        let id = FieldId::nil();
        assert!(ResonanceError::UnknownField { id }.is_not_found());
        assert!(ResonanceError::UnknownConnection {
            key: ConnectionKey::new(id, id)
        }
        .is_not_found());
        assert!(!ResonanceError::invalid_parameter("x").is_not_found());
        println!("[PASS] test_not_found_classification");
    }
}
