//! Controller tests against scripted backends

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use sv_shared::{CheckCodeResponse, StartVerificationResponse};

use super::*;
use crate::backend::VerifyBackend;
use crate::error::ClientError;
use crate::silent_auth::{SilentAuthClient, SilentAuthProbe};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Start(String),
    Check(String, String),
    Advance(String),
}

enum StartReply {
    Started(&'static str, Option<&'static str>),
    Fail,
}

enum CheckReply {
    Verified,
    Rejected,
    Fail(&'static str),
}

#[derive(Default)]
struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    starts: Mutex<VecDeque<StartReply>>,
    checks: Mutex<VecDeque<CheckReply>>,
    fail_advance: bool,
    start_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl ScriptedBackend {
    fn new(starts: Vec<StartReply>, checks: Vec<CheckReply>) -> Self {
        Self {
            starts: Mutex::new(starts.into()),
            checks: Mutex::new(checks.into()),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn backend_error(message: &str) -> ClientError {
    ClientError::Status {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl VerifyBackend for ScriptedBackend {
    async fn start(&self, phone: &str) -> Result<StartVerificationResponse, ClientError> {
        self.record(Call::Start(phone.to_string()));
        let reply = self.starts.lock().unwrap().pop_front();

        let gate = self.start_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match reply {
            Some(StartReply::Started(request_id, check_url)) => Ok(StartVerificationResponse {
                request_id: request_id.to_string(),
                check_url: check_url.map(str::to_string),
            }),
            Some(StartReply::Fail) | None => Err(backend_error("Invalid phone number")),
        }
    }

    async fn check_code(
        &self,
        request_id: &str,
        code: &str,
    ) -> Result<CheckCodeResponse, ClientError> {
        self.record(Call::Check(request_id.to_string(), code.to_string()));
        match self.checks.lock().unwrap().pop_front() {
            Some(CheckReply::Verified) => Ok(CheckCodeResponse {
                verified: true,
                status: Some("completed".to_string()),
            }),
            Some(CheckReply::Rejected) => Ok(CheckCodeResponse {
                verified: false,
                status: Some("invalid_code".to_string()),
            }),
            Some(CheckReply::Fail(message)) => Err(backend_error(message)),
            None => Err(backend_error("unexpected check")),
        }
    }

    async fn advance_workflow(&self, request_id: &str) -> Result<(), ClientError> {
        self.record(Call::Advance(request_id.to_string()));
        if self.fail_advance {
            return Err(backend_error("There are no more workflows to advance to."));
        }
        Ok(())
    }
}

struct ScriptedProbe {
    probe: SilentAuthProbe,
    urls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    fn returning(probe: SilentAuthProbe) -> Self {
        Self {
            probe,
            urls: Mutex::new(Vec::new()),
        }
    }

    fn code(code: &str) -> Self {
        Self::returning(SilentAuthProbe {
            http_status: Some(200),
            code: Some(code.to_string()),
            error: None,
        })
    }
}

#[async_trait]
impl SilentAuthClient for ScriptedProbe {
    async fn probe(&self, check_url: &str) -> SilentAuthProbe {
        self.urls.lock().unwrap().push(check_url.to_string());
        self.probe.clone()
    }
}

const PHONE: &str = "+15551234567";
const CHECK_URL: &str = "https://api.nexmo.com/v2/verify/abc123/silent-auth/redirect";

fn controller(
    backend: &Arc<ScriptedBackend>,
    probe: &Arc<ScriptedProbe>,
) -> WorkflowController<ScriptedBackend, ScriptedProbe> {
    WorkflowController::new(backend.clone(), probe.clone())
}

#[tokio::test]
async fn test_silent_auth_happy_path() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![StartReply::Started("abc123", Some(CHECK_URL))],
        vec![CheckReply::Verified],
    ));
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);

    let transition = controller.begin_verification(PHONE).await.unwrap();

    assert_eq!(
        transition,
        Transition::Applied(VerificationState::Verified(VerifiedVia::SilentAuth))
    );
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.message.as_deref(), Some(MSG_VERIFIED_SILENT_AUTH));
    assert!(!snapshot.busy);
    assert_eq!(snapshot.request.unwrap().request_id, "abc123");
    assert_eq!(*probe.urls.lock().unwrap(), vec![CHECK_URL.to_string()]);
    assert_eq!(
        backend.calls(),
        vec![
            Call::Start(PHONE.to_string()),
            Call::Check("abc123".to_string(), "000000".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_start_failure_resets_to_idle() {
    let backend = Arc::new(ScriptedBackend::new(vec![StartReply::Fail], vec![]));
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);

    let transition = controller.begin_verification(PHONE).await.unwrap();

    assert_eq!(transition, Transition::Applied(VerificationState::Idle));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.message.as_deref(), Some(MSG_UNABLE_TO_VERIFY));
    assert!(snapshot.request.is_none());
    assert!(probe.urls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_probe_network_error_falls_back_then_invalid_code() {
    let backend = Arc::new(ScriptedBackend {
        fail_advance: true,
        ..ScriptedBackend::new(
            vec![StartReply::Started("abc123", Some(CHECK_URL))],
            vec![CheckReply::Rejected, CheckReply::Verified],
        )
    });
    let probe = Arc::new(ScriptedProbe::returning(SilentAuthProbe::failed(
        "connection reset",
    )));
    let controller = controller(&backend, &probe);

    // Advance fails, fallback still happens
    let transition = controller.begin_verification(PHONE).await.unwrap();
    assert_eq!(transition, Transition::Applied(VerificationState::AwaitingSmsCode));
    assert_eq!(
        controller.snapshot().message.as_deref(),
        Some(MSG_SILENT_AUTH_FAILED)
    );

    let transition = controller.submit_code("999999").await.unwrap();
    assert_eq!(transition, Transition::Applied(VerificationState::Invalid));
    assert_eq!(controller.snapshot().message.as_deref(), Some(MSG_INVALID_SMS_CODE));

    // Resubmission from Invalid
    let transition = controller.submit_code("123456").await.unwrap();
    assert_eq!(
        transition,
        Transition::Applied(VerificationState::Verified(VerifiedVia::Sms))
    );
    assert_eq!(controller.snapshot().message.as_deref(), Some(MSG_VERIFIED_SMS));

    assert_eq!(
        backend.calls(),
        vec![
            Call::Start(PHONE.to_string()),
            Call::Advance("abc123".to_string()),
            Call::Check("abc123".to_string(), "999999".to_string()),
            Call::Check("abc123".to_string(), "123456".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_probe_without_code_falls_back() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![StartReply::Started("abc123", Some(CHECK_URL))],
        vec![],
    ));
    let probe = Arc::new(ScriptedProbe::returning(SilentAuthProbe {
        http_status: Some(200),
        code: None,
        error: Some("check URL response carried no code".to_string()),
    }));
    let controller = controller(&backend, &probe);

    let transition = controller.begin_verification(PHONE).await.unwrap();

    assert_eq!(transition, Transition::Applied(VerificationState::AwaitingSmsCode));
    assert_eq!(
        controller.snapshot().message.as_deref(),
        Some(MSG_SILENT_AUTH_FAILED)
    );
    assert_eq!(
        backend.calls(),
        vec![
            Call::Start(PHONE.to_string()),
            Call::Advance("abc123".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_missing_check_url_skips_probe() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![StartReply::Started("abc123", None)],
        vec![],
    ));
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);

    let transition = controller.begin_verification(PHONE).await.unwrap();

    assert_eq!(transition, Transition::Applied(VerificationState::AwaitingSmsCode));
    assert!(probe.urls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_silent_auth_code_not_verified_falls_back_to_sms() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![StartReply::Started("abc123", Some(CHECK_URL))],
        vec![CheckReply::Rejected],
    ));
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);

    let transition = controller.begin_verification(PHONE).await.unwrap();

    assert_eq!(transition, Transition::Applied(VerificationState::AwaitingSmsCode));
    assert_eq!(controller.snapshot().message.as_deref(), Some(MSG_FALLBACK_TO_SMS));
    assert_eq!(backend.calls().last(), Some(&Call::Advance("abc123".to_string())));
}

#[tokio::test]
async fn test_silent_auth_check_error_falls_back_to_sms() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![StartReply::Started("abc123", Some(CHECK_URL))],
        vec![CheckReply::Fail("Verification provider unreachable: timeout")],
    ));
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);

    let transition = controller.begin_verification(PHONE).await.unwrap();

    assert_eq!(transition, Transition::Applied(VerificationState::AwaitingSmsCode));
    assert_eq!(
        controller.snapshot().message.as_deref(),
        Some(MSG_SILENT_AUTH_FAILED)
    );
}

#[tokio::test]
async fn test_submit_error_keeps_state_and_shows_text() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![StartReply::Started("abc123", None)],
        vec![CheckReply::Fail("Request 'abc123' was not found")],
    ));
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);
    controller.begin_verification(PHONE).await.unwrap();

    let transition = controller.submit_code("123456").await.unwrap();

    assert_eq!(transition, Transition::Applied(VerificationState::AwaitingSmsCode));
    assert_eq!(
        controller.snapshot().message.as_deref(),
        Some("Error: Request 'abc123' was not found")
    );
}

#[tokio::test]
async fn test_submit_without_active_request_fails_fast() {
    let backend = Arc::new(ScriptedBackend::default());
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);

    let err = controller.submit_code("123456").await.unwrap_err();
    assert!(matches!(err, ClientError::NoActiveRequest));

    let err = controller.submit_code("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingField("code")));

    let err = controller.begin_verification("").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingField("phone")));

    assert!(backend.calls().is_empty());
    assert_eq!(controller.snapshot(), SessionSnapshot::default());
}

#[tokio::test]
async fn test_submit_after_verification_is_rejected() {
    let backend = Arc::new(ScriptedBackend::new(
        vec![StartReply::Started("abc123", Some(CHECK_URL))],
        vec![CheckReply::Verified],
    ));
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = controller(&backend, &probe);
    controller.begin_verification(PHONE).await.unwrap();

    let err = controller.submit_code("123456").await.unwrap_err();
    assert!(matches!(err, ClientError::NoActiveRequest));
    assert_eq!(backend.calls().len(), 2);
}

#[tokio::test]
async fn test_stale_attempt_never_overwrites_newer_one() {
    let (release, gate) = oneshot::channel();
    let backend = Arc::new(ScriptedBackend::new(
        vec![
            StartReply::Started("old", None),
            StartReply::Started("new", Some(CHECK_URL)),
        ],
        vec![CheckReply::Verified],
    ));
    *backend.start_gate.lock().unwrap() = Some(gate);
    let probe = Arc::new(ScriptedProbe::code("000000"));
    let controller = Arc::new(controller(&backend, &probe));

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.begin_verification("+15550000001").await })
    };
    while backend.calls().is_empty() {
        tokio::task::yield_now().await;
    }

    let second = controller.begin_verification(PHONE).await.unwrap();
    assert_eq!(
        second,
        Transition::Applied(VerificationState::Verified(VerifiedVia::SilentAuth))
    );

    release.send(()).unwrap();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, Transition::Superseded);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.generation, 2);
    assert_eq!(snapshot.phone, PHONE);
    assert_eq!(snapshot.request.unwrap().request_id, "new");
    assert_eq!(snapshot.message.as_deref(), Some(MSG_VERIFIED_SILENT_AUTH));
    assert!(!backend.calls().contains(&Call::Advance("old".to_string())));
}
