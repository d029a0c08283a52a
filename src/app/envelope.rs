//! Normalized response envelope
//!
//! Every network-facing operation in this library returns the same
//! [`ResponseEnvelope`] shape, whether the underlying exchange succeeded,
//! failed at the transport, or was answered from cache. Failures travel as
//! data; a caller opts into an error with [`ResponseEnvelope::check`] or
//! [`ResponseEnvelope::into_result`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::EnvelopeError;

/// Extended error detail attached to a failed envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human-readable description of what went wrong
    pub message: String,
    /// Additional detail lines (e.g., every colliding file in a merge)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorInfo {
    /// Create error info with a message and no details
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create error info with detail lines
    pub fn with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }
}

/// The standard result wrapper returned by every network-facing operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Whether the exchange (or merge) succeeded
    pub success: bool,
    /// Parsed response payload; `Value::Null` when the body was not JSON
    #[serde(default)]
    pub data: Value,
    /// HTTP status code (0 when the transport never produced a response)
    pub code: u16,
    /// Extended error detail for failed envelopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<ErrorInfo>,
    /// Whether the body parsed as JSON
    pub parsed: bool,
    /// Response headers of the exchange
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Raw response body text
    #[serde(default)]
    pub content: String,
    /// Whether this envelope was answered from cache
    pub cached: bool,
    /// Strategy name when a reconcile failed on a collision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision: Option<String>,
}

impl ResponseEnvelope {
    /// Create a successful envelope carrying parsed JSON data
    pub fn ok(code: u16, data: Value) -> Self {
        Self {
            success: true,
            data,
            code,
            extended: None,
            parsed: true,
            headers: HashMap::new(),
            content: String::new(),
            cached: false,
            collision: None,
        }
    }

    /// Create a failed envelope with extended error detail
    pub fn error(code: u16, extended: ErrorInfo) -> Self {
        Self {
            success: false,
            data: Value::Null,
            code,
            extended: Some(extended),
            parsed: false,
            headers: HashMap::new(),
            content: String::new(),
            cached: false,
            collision: None,
        }
    }

    /// Attach response headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Attach the raw body text
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// The server-supplied error message, when the payload carries one
    ///
    /// List and content endpoints report failures as `{"error": {"message":
    /// ...}}`; that message is preferred over the generic extended detail.
    pub fn server_message(&self) -> Option<&str> {
        self.data.get("error")?.get("message")?.as_str()
    }

    /// Error-raising accessor: no-op passthrough on success
    ///
    /// On failure, raises an [`EnvelopeError`] using the server-supplied
    /// message if present, else the extended detail.
    pub fn check(&self) -> Result<&Self, EnvelopeError> {
        if self.success {
            return Ok(self);
        }
        Err(self.to_error())
    }

    /// Owned variant of [`check`](Self::check)
    pub fn into_result(self) -> Result<Self, EnvelopeError> {
        if self.success {
            Ok(self)
        } else {
            Err(self.to_error())
        }
    }

    fn to_error(&self) -> EnvelopeError {
        let message = self
            .server_message()
            .map(str::to_string)
            .or_else(|| self.extended.as_ref().map(|e| e.message.clone()))
            .unwrap_or_else(|| format!("request failed with status {}", self.code));
        EnvelopeError {
            code: self.code,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_passes_through_success() {
        let envelope = ResponseEnvelope::ok(200, json!({"files": []}));
        assert!(envelope.check().is_ok());
        assert!(envelope.into_result().is_ok());
    }

    #[test]
    fn test_check_prefers_server_message() {
        let mut envelope = ResponseEnvelope::error(404, ErrorInfo::new("generic detail"));
        envelope.data = json!({"error": {"message": "Requested entity was not found"}});

        let err = envelope.check().unwrap_err();
        assert_eq!(err.code, 404);
        assert_eq!(err.message, "Requested entity was not found");
    }

    #[test]
    fn test_check_falls_back_to_extended_detail() {
        let envelope = ResponseEnvelope::error(502, ErrorInfo::new("connection reset"));
        let err = envelope.check().unwrap_err();
        assert_eq!(err.message, "connection reset");
    }

    #[test]
    fn test_check_without_any_detail_names_the_status() {
        let mut envelope = ResponseEnvelope::error(500, ErrorInfo::new(""));
        envelope.extended = None;
        let err = envelope.check().unwrap_err();
        assert!(err.message.contains("500"));
    }

    #[test]
    fn test_new_envelopes_are_not_cached() {
        assert!(!ResponseEnvelope::ok(200, Value::Null).cached);
        assert!(!ResponseEnvelope::error(500, ErrorInfo::new("boom")).cached);
    }
}
