//! Error types for bizchat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for bizchat operations
///
/// Covers configuration loading, calls to the chat backend and the
/// document storage proxy, and the usual IO and serialization failures.
#[derive(Error, Debug)]
pub enum BizchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend answered with a non-success HTTP status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body or reason text
        message: String,
    },

    /// Backend could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// Health probe answered with something other than "healthy"
    #[error("Backend reported unhealthy status: {0}")]
    Unhealthy(String),

    /// Document storage proxy errors (upload, delete, signing)
    #[error("Document storage error: {0}")]
    Document(String),

    /// Input rejected before reaching the backend
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for bizchat operations
///
/// Uses `anyhow::Error` so callers can attach context while the concrete
/// `BizchatError` stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = BizchatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_api_error_display() {
        let error = BizchatError::Api {
            status: 404,
            message: "session not found".to_string(),
        };
        assert_eq!(error.to_string(), "API error (404): session not found");
    }

    #[test]
    fn test_connection_error_display() {
        let error = BizchatError::Connection("connection refused".to_string());
        assert_eq!(error.to_string(), "Connection error: connection refused");
    }

    #[test]
    fn test_unhealthy_error_display() {
        let error = BizchatError::Unhealthy("degraded".to_string());
        assert_eq!(
            error.to_string(),
            "Backend reported unhealthy status: degraded"
        );
    }

    #[test]
    fn test_document_error_display() {
        let error = BizchatError::Document("file too large".to_string());
        assert_eq!(error.to_string(), "Document storage error: file too large");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: BizchatError = io_error.into();
        assert!(matches!(error, BizchatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: BizchatError = json_error.into();
        assert!(matches!(error, BizchatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: BizchatError = yaml_error.into();
        assert!(matches!(error, BizchatError::Yaml(_)));
    }

    #[test]
    fn test_error_downcasts_through_anyhow() {
        let result: Result<()> = Err(BizchatError::InvalidInput("empty".to_string()).into());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BizchatError>(),
            Some(BizchatError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BizchatError>();
    }
}
