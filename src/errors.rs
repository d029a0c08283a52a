//! Error types for scriptsync
//!
//! This module defines the error types for all components of the library.
//! Configuration problems are fatal and surface as `Err` before any I/O;
//! everything else (transport failures, merge collisions) travels as data
//! inside a [`ResponseEnvelope`](crate::app::ResponseEnvelope) until a caller
//! explicitly converts it with the envelope's throwing accessor.

use thiserror::Error;

/// Configuration errors
///
/// These are raised synchronously, before any network call, and are never
/// returned as envelope data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown file type string received from a caller or the wire
    #[error("Unknown file type: {value}. Expected one of SERVER_JS, HTML, JSON")]
    UnknownFileType { value: String },

    /// Unknown collision strategy string
    #[error("Unknown collision strategy: {value}. Expected one of abort, replace, skip, rename")]
    UnknownStrategy { value: String },

    /// Base URL could not be parsed or joined with a resource path
    #[error("Invalid API URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client construction failed (TLS backend, invalid settings)
    #[error("Failed to build HTTP client: {reason}")]
    HttpClient { reason: String },
}

/// The thrown form of a failed envelope
///
/// Produced on demand by the envelope's `check()` / `into_result()`
/// accessors; carries the HTTP status code and the preferred message
/// (server-supplied over extended detail).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Request failed (HTTP {code}): {message}")]
pub struct EnvelopeError {
    /// HTTP status code of the failed exchange (0 when transport never connected)
    pub code: u16,
    /// Server-supplied error message if present, else the extended detail
    pub message: String,
}

/// Top-level library error that can represent any error type
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A caller opted into throwing on a failed envelope
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl SyncError {
    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            SyncError::Config(_) => "config",
            SyncError::Envelope(_) => "envelope",
        }
    }

    /// Check if the error is recoverable by retrying with different inputs
    ///
    /// Configuration errors require a code change; envelope errors carry the
    /// remote outcome and may succeed with a different strategy or later.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SyncError::Config(_) => false,
            SyncError::Envelope(_) => true,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SyncError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let config = SyncError::Config(ConfigError::UnknownFileType {
            value: "GS".to_string(),
        });
        assert_eq!(config.category(), "config");
        assert!(!config.is_recoverable());

        let envelope = SyncError::Envelope(EnvelopeError {
            code: 404,
            message: "Requested entity was not found".to_string(),
        });
        assert_eq!(envelope.category(), "envelope");
        assert!(envelope.is_recoverable());
    }

    #[test]
    fn test_error_messages_are_actionable() {
        let err = ConfigError::UnknownStrategy {
            value: "merge".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("merge"));
        assert!(text.contains("rename"));
    }
}
