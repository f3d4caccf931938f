//! Tests for the Vonage Verify v2 adapter against a local mock server

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sv_core::domain::{default_workflow, CodeSubmission, NewVerification, RequestId, WorkflowAdvance};
use sv_core::errors::ProviderError;
use sv_core::services::VerificationProvider;

use crate::provider::vonage::auth::{Claims, TokenSigner, TOKEN_TTL_SECS};
use crate::provider::vonage::models::Problem;
use crate::provider::vonage::{load_private_key, VonageConfig, VonageVerifyProvider};
use crate::InfrastructureError;

const PRIVATE_KEY: &str = include_str!("../../../tests/fixtures/test_private_key.pem");
const PUBLIC_KEY: &str = include_str!("../../../tests/fixtures/test_public_key.pem");
const APP_ID: &str = "aaaaaaaa-bbbb-cccc-dddd-0123456789ab";
const REQUEST_ID: &str = "c11236f4-00bf-4b89-84ba-88b25df97315";

fn provider_for(server: &MockServer) -> VonageVerifyProvider {
    let config = VonageConfig::new(APP_ID, PRIVATE_KEY, &server.uri()).unwrap();
    VonageVerifyProvider::new(config).unwrap()
}

fn new_verification() -> NewVerification {
    NewVerification {
        phone: "+15551234567".to_string(),
        brand: "DemoApp".to_string(),
        workflow: default_workflow(),
    }
}

fn submission(code: &str) -> CodeSubmission {
    CodeSubmission {
        request_id: RequestId::parse(REQUEST_ID).unwrap(),
        code: code.to_string(),
    }
}

fn decode_claims(token: &str) -> Claims {
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
    decode::<Claims>(token, &key, &Validation::new(Algorithm::RS256))
        .unwrap()
        .claims
}

#[test]
fn test_token_claims() {
    let signer = TokenSigner::new(APP_ID, &PRIVATE_KEY.to_string().into()).unwrap();

    let first = decode_claims(&signer.sign().unwrap());
    let second = decode_claims(&signer.sign().unwrap());

    assert_eq!(first.application_id, APP_ID);
    assert_eq!(first.exp - first.iat, TOKEN_TTL_SECS);
    assert_ne!(first.jti, second.jti);
}

#[test]
fn test_invalid_private_key_is_rejected() {
    let config = VonageConfig::new(APP_ID, "not a key", "https://api.nexmo.com").unwrap();
    let err = VonageVerifyProvider::new(config).unwrap_err();
    assert!(matches!(err, InfrastructureError::Token(_)));
}

#[test]
fn test_config_rejects_bad_base_url() {
    let err = VonageConfig::new(APP_ID, PRIVATE_KEY, "mailto:ops@example.com").unwrap_err();
    assert!(matches!(err, InfrastructureError::Config(_)));

    let err = VonageConfig::new(APP_ID, PRIVATE_KEY, "not a url").unwrap_err();
    assert!(matches!(err, InfrastructureError::Config(_)));
}

#[test]
fn test_load_private_key_sources() {
    let escaped = PRIVATE_KEY.trim().replace('\n', "\\n");
    let inline = load_private_key(&escaped).unwrap();
    assert_eq!(inline, PRIVATE_KEY.trim());

    let from_file = load_private_key(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/test_private_key.pem"
    ))
    .unwrap();
    assert_eq!(from_file, PRIVATE_KEY);

    let err = load_private_key("/nonexistent/private.key").unwrap_err();
    assert!(matches!(err, InfrastructureError::Config(_)));
}

#[test]
fn test_problem_message_precedence() {
    let problem = Problem::parse(r#"{"title":"Conflict","detail":"Concurrent verifications to the same number are not allowed."}"#);
    assert_eq!(
        problem.message(""),
        "Concurrent verifications to the same number are not allowed."
    );

    let problem = Problem::parse(r#"{"title":"Not Found"}"#);
    assert_eq!(problem.message(""), "Not Found");

    let problem = Problem::parse("upstream exploded");
    assert_eq!(problem.message("upstream exploded"), "upstream exploded");
}

#[test]
fn test_problem_blank_detail_falls_back_to_title() {
    let body = r#"{"title":"Conflict","detail":""}"#;
    assert_eq!(Problem::parse(body).message(body), "Conflict");

    let body = r#"{"title":"  ","detail":"  "}"#;
    assert_eq!(Problem::parse(body).message(body), body);
}

#[tokio::test]
async fn test_start_verification_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/verify"))
        .and(header_exists("authorization"))
        .and(body_json(json!({
            "brand": "DemoApp",
            "workflow": [
                { "channel": "silent_auth", "to": "+15551234567" },
                { "channel": "sms", "to": "+15551234567" }
            ]
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "request_id": REQUEST_ID,
            "check_url": "https://api.nexmo.com/v2/verify/c11236f4/silent-auth/redirect"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let request = provider.start_verification(&new_verification()).await.unwrap();

    assert_eq!(request.request_id.as_str(), REQUEST_ID);
    assert_eq!(
        request.check_url.as_deref(),
        Some("https://api.nexmo.com/v2/verify/c11236f4/silent-auth/redirect")
    );

    let received = server.received_requests().await.unwrap();
    let auth = received[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    let token = auth.strip_prefix("Bearer ").unwrap();
    assert_eq!(decode_claims(token).application_id, APP_ID);
}

#[tokio::test]
async fn test_start_verification_without_check_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/verify"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "request_id": REQUEST_ID })))
        .mount(&server)
        .await;

    let request = provider_for(&server)
        .start_verification(&new_verification())
        .await
        .unwrap();

    assert!(request.check_url.is_none());
    assert!(!request.supports_silent_auth());
}

#[tokio::test]
async fn test_start_verification_surfaces_problem_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/verify"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "type": "https://developer.nexmo.com/api-errors#invalid-params",
            "title": "Invalid params",
            "detail": "The value of one or more parameters is invalid",
            "instance": "bf0ca0bf927b3b52e3cb03217e1a1ddf"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .start_verification(&new_verification())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "The value of one or more parameters is invalid");
}

#[tokio::test]
async fn test_start_verification_rejects_malformed_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/verify"))
        .respond_with(ResponseTemplate::new(202).set_body_string("<html>accepted</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .start_verification(&new_verification())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_unreachable_provider() {
    // Nothing listens on the discard port
    let config = VonageConfig::new(APP_ID, PRIVATE_KEY, "http://127.0.0.1:9").unwrap();
    let provider = VonageVerifyProvider::new(config).unwrap();

    let err = provider.start_verification(&new_verification()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Unreachable { .. }));
}

#[tokio::test]
async fn test_check_code_completed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/verify/{}", REQUEST_ID)))
        .and(body_json(json!({ "code": "1234" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": REQUEST_ID,
            "status": "completed"
        })))
        .mount(&server)
        .await;

    let outcome = provider_for(&server)
        .check_code(&submission("1234"))
        .await
        .unwrap();

    assert!(outcome.verified);
    assert_eq!(outcome.provider_status.as_deref(), Some("completed"));
}

#[tokio::test]
async fn test_check_code_other_status_is_not_verified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/verify/{}", REQUEST_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": REQUEST_ID,
            "status": "failed"
        })))
        .mount(&server)
        .await;

    let outcome = provider_for(&server)
        .check_code(&submission("1234"))
        .await
        .unwrap();

    assert!(!outcome.verified);
    assert_eq!(outcome.provider_status.as_deref(), Some("failed"));
}

#[tokio::test]
async fn test_check_code_invalid_code_is_negative_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/verify/{}", REQUEST_ID)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "https://www.developer.vonage.com/api-errors/verify#invalid-code",
            "title": "Invalid Code",
            "detail": "The code you provided does not match the expected value.",
            "instance": "bf0ca0bf927b3b52e3cb03217e1a1ddf"
        })))
        .mount(&server)
        .await;

    let outcome = provider_for(&server)
        .check_code(&submission("0000"))
        .await
        .unwrap();

    assert!(!outcome.verified);
    assert_eq!(outcome.provider_status.as_deref(), Some("invalid_code"));
}

#[tokio::test]
async fn test_check_code_after_completion_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/verify/{}", REQUEST_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "detail": "Request 'c11236f4-00bf-4b89-84ba-88b25df97315' was not found or it has been verified already."
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .check_code(&submission("1234"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("verified already"));
}

#[tokio::test]
async fn test_advance_workflow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/verify/{}/next_workflow", REQUEST_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    provider_for(&server)
        .advance_workflow(&WorkflowAdvance {
            request_id: RequestId::parse(REQUEST_ID).unwrap(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_advance_workflow_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/verify/{}/next_workflow", REQUEST_ID)))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "title": "Conflict",
            "detail": "There are no more workflows to advance to."
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .advance_workflow(&WorkflowAdvance {
            request_id: RequestId::parse(REQUEST_ID).unwrap(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "There are no more workflows to advance to.");
}

#[tokio::test]
async fn test_empty_error_body_names_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v2/verify/{}/next_workflow", REQUEST_ID)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .advance_workflow(&WorkflowAdvance {
            request_id: RequestId::parse(REQUEST_ID).unwrap(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Verification provider returned HTTP 503");
}
