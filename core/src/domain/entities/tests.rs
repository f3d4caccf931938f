//! Unit tests for verification entities

use serde_json::json;

use crate::domain::entities::{CallbackEvent, VerificationOutcome, VerificationRequest};
use crate::domain::value_objects::RequestId;

#[test]
fn test_outcome_completed_is_verified() {
    let outcome = VerificationOutcome::from_provider_status("completed");
    assert!(outcome.verified);
    assert_eq!(outcome.provider_status.as_deref(), Some("completed"));
}

#[test]
fn test_outcome_other_status_is_not_verified() {
    for status in ["failed", "expired", "user_rejected", "COMPLETED"] {
        let outcome = VerificationOutcome::from_provider_status(status);
        assert!(!outcome.verified, "status {} must not verify", status);
    }
}

#[test]
fn test_invalid_code_outcome() {
    let outcome = VerificationOutcome::invalid_code();
    assert!(!outcome.verified);
    assert_eq!(outcome.provider_status.as_deref(), Some("invalid_code"));
}

#[test]
fn test_request_silent_auth_support() {
    let id = RequestId::parse("abc123").unwrap();
    let with_url = VerificationRequest::new(id.clone(), Some("https://check".to_string()));
    let without_url = VerificationRequest::new(id.clone(), None);
    let empty_url = VerificationRequest::new(id, Some(String::new()));

    assert!(with_url.supports_silent_auth());
    assert!(!without_url.supports_silent_auth());
    assert!(!empty_url.supports_silent_auth());
}

#[test]
fn test_callback_event_extracts_fields() {
    let event = CallbackEvent::from_payload(json!({
        "request_id": "abc123",
        "status": "completed",
        "channel_timeout": 300
    }));
    assert_eq!(event.request_id.as_deref(), Some("abc123"));
    assert_eq!(event.status.as_deref(), Some("completed"));
    assert!(event.is_recognized());
}

#[test]
fn test_callback_event_tolerates_unknown_shapes() {
    let event = CallbackEvent::from_payload(json!({ "status": 42 }));
    assert!(event.status.is_none());
    assert!(!event.is_recognized());

    let event = CallbackEvent::from_payload(json!(["not", "an", "object"]));
    assert!(event.request_id.is_none());

    let event = CallbackEvent::unrecognized("garbage");
    assert_eq!(event.payload, json!("garbage"));
}
