//! Asynchronous status events pushed by the provider

use serde_json::Value;

/// A provider callback, recognized or not
///
/// Fields are extracted best-effort; an unrecognized payload is still a valid
/// event and must be acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackEvent {
    pub request_id: Option<String>,
    pub status: Option<String>,
    pub payload: Value,
}

impl CallbackEvent {
    /// Build an event from whatever JSON the provider sent
    pub fn from_payload(payload: Value) -> Self {
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            request_id: field("request_id"),
            status: field("status"),
            payload,
        }
    }

    /// Event for a body that was not JSON at all
    pub fn unrecognized(raw: &str) -> Self {
        Self {
            request_id: None,
            status: None,
            payload: Value::String(raw.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.request_id.is_some() && self.status.is_some()
    }
}
