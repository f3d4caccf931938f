//! Shared error response structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error body returned by every orchestrator endpoint
///
/// `error` carries the human-readable message (the provider's message for
/// provider failures), `code` is the stable identifier clients can match on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Error code for client identification
    pub code: String,

    /// Additional error details (missing field name, provider status, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const MISSING_FIELD: &str = "MISSING_FIELD";
    pub const INVALID_FORMAT: &str = "INVALID_FORMAT";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";
    pub const PROVIDER_UNREACHABLE: &str = "PROVIDER_UNREACHABLE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new(error_codes::MISSING_FIELD, "Missing field: phone")
            .add_detail("field", "phone");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "Missing field: phone");
        assert_eq!(json["code"], "MISSING_FIELD");
        assert_eq!(json["details"]["field"], "phone");
    }

    #[test]
    fn test_details_omitted_when_empty() {
        let response = ErrorResponse::new(error_codes::PROVIDER_ERROR, "boom");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
    }
}
