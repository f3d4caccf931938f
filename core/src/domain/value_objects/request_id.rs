//! Provider-issued verification request identifier

use serde::Serialize;
use std::fmt;

use crate::errors::ValidationError;

/// Wire name of the request identifier, used in validation errors
pub const REQUEST_ID_FIELD: &str = "request_id";

/// Opaque identifier correlating every operation of one verification attempt.
///
/// Only ever built from provider output or validated wire input; it is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Parse a request id, rejecting empty and whitespace-only values
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::RequiredField {
                field: REQUEST_ID_FIELD.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
