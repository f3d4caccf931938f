//! Workflow controller
//!
//! One controller serves one sign-in screen. Every `begin_verification`
//! starts a new generation; an async step only writes back while its
//! generation is still current, so an abandoned attempt can never overwrite
//! a newer one.

use std::sync::{Arc, Mutex, MutexGuard};

use sv_shared::phone::mask_phone_number;

use super::state::{
    ActiveRequest, SessionSnapshot, Transition, VerificationState, VerifiedVia,
    MSG_FALLBACK_TO_SMS, MSG_INVALID_SMS_CODE, MSG_SILENT_AUTH_FAILED, MSG_UNABLE_TO_VERIFY,
    MSG_VERIFIED_SILENT_AUTH, MSG_VERIFIED_SMS,
};
use crate::backend::VerifyBackend;
use crate::error::ClientError;
use crate::silent_auth::{SilentAuthClient, SilentAuthProbe};

pub struct WorkflowController<B: VerifyBackend + ?Sized, S: SilentAuthClient + ?Sized> {
    backend: Arc<B>,
    silent_auth: Arc<S>,
    session: Mutex<SessionSnapshot>,
}

impl<B, S> WorkflowController<B, S>
where
    B: VerifyBackend + ?Sized,
    S: SilentAuthClient + ?Sized,
{
    pub fn new(backend: Arc<B>, silent_auth: Arc<S>) -> Self {
        Self {
            backend,
            silent_auth,
            session: Mutex::new(SessionSnapshot::default()),
        }
    }

    /// Current session, for rendering
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().clone()
    }

    /// Start a new attempt for `phone`, discarding any previous one
    ///
    /// Runs start → probe → code check, falling back to SMS when silent
    /// auth yields nothing usable. Backend failures are reported through
    /// the session message; only a blank phone is returned as an error,
    /// before anything is sent.
    pub async fn begin_verification(&self, phone: &str) -> Result<Transition, ClientError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(ClientError::MissingField("phone"));
        }

        let generation = {
            let mut session = self.lock();
            session.generation += 1;
            session.phone = phone.to_string();
            session.request = None;
            session.state = VerificationState::Idle;
            session.message = None;
            session.busy = true;
            session.generation
        };

        tracing::info!(
            phone = %mask_phone_number(phone),
            generation,
            "Starting verification attempt"
        );

        let started = match self.backend.start(phone).await {
            Ok(started) => started,
            Err(e) => {
                tracing::warn!(error = %e, generation, "Verification start failed");
                return Ok(self.finish(generation, |session| {
                    session.request = None;
                    session.state = VerificationState::Idle;
                    session.message = Some(MSG_UNABLE_TO_VERIFY.to_string());
                }));
            }
        };

        let request = ActiveRequest {
            request_id: started.request_id,
            check_url: started.check_url.filter(|url| !url.trim().is_empty()),
        };
        let recorded = self.update(generation, |session| {
            session.request = Some(request.clone());
            session.state = VerificationState::AwaitingSilentAuth;
        });
        if !recorded {
            return Ok(Transition::Superseded);
        }

        let probe = match request.check_url.as_deref() {
            Some(check_url) => self.silent_auth.probe(check_url).await,
            None => SilentAuthProbe::failed("no check URL issued"),
        };

        let Some(code) = probe.usable_code() else {
            tracing::info!(
                generation,
                http_status = probe.http_status,
                error = probe.error.as_deref().unwrap_or_default(),
                "Silent auth unavailable, falling back to SMS"
            );
            return Ok(self
                .fall_back(generation, &request.request_id, MSG_SILENT_AUTH_FAILED)
                .await);
        };

        if !self.update(generation, |session| {
            session.state = VerificationState::SilentAuthResult;
        }) {
            return Ok(Transition::Superseded);
        }

        match self.backend.check_code(&request.request_id, code).await {
            Ok(checked) if checked.verified => Ok(self.finish(generation, |session| {
                session.state = VerificationState::Verified(VerifiedVia::SilentAuth);
                session.message = Some(MSG_VERIFIED_SILENT_AUTH.to_string());
            })),
            Ok(checked) => {
                tracing::info!(
                    generation,
                    status = checked.status.as_deref().unwrap_or_default(),
                    "Silent auth code not accepted"
                );
                Ok(self
                    .fall_back(generation, &request.request_id, MSG_FALLBACK_TO_SMS)
                    .await)
            }
            Err(e) => {
                tracing::warn!(error = %e, generation, "Silent auth code check failed");
                Ok(self
                    .fall_back(generation, &request.request_id, MSG_SILENT_AUTH_FAILED)
                    .await)
            }
        }
    }

    /// Submit a typed SMS code for the current request
    ///
    /// Fails fast, without calling the backend, on a blank code or when the
    /// session is not waiting for one. A backend failure is shown as
    /// `"Error: <text>"` and leaves the state unchanged.
    pub async fn submit_code(&self, code: &str) -> Result<Transition, ClientError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ClientError::MissingField("code"));
        }

        let (generation, request_id) = {
            let mut session = self.lock();
            let request_id = match (&session.request, session.state.accepts_sms_code()) {
                (Some(request), true) => request.request_id.clone(),
                _ => return Err(ClientError::NoActiveRequest),
            };
            session.busy = true;
            (session.generation, request_id)
        };

        let transition = match self.backend.check_code(&request_id, code).await {
            Ok(checked) if checked.verified => self.finish(generation, |session| {
                session.state = VerificationState::Verified(VerifiedVia::Sms);
                session.message = Some(MSG_VERIFIED_SMS.to_string());
            }),
            Ok(_) => self.finish(generation, |session| {
                session.state = VerificationState::Invalid;
                session.message = Some(MSG_INVALID_SMS_CODE.to_string());
            }),
            Err(e) => {
                tracing::warn!(error = %e, generation, "SMS code check failed");
                self.finish(generation, |session| {
                    session.message = Some(format!("Error: {}", e));
                })
            }
        };

        Ok(transition)
    }

    /// Advance to SMS without letting the outcome of the advance matter
    async fn fall_back(&self, generation: u64, request_id: &str, message: &str) -> Transition {
        if !self.is_current(generation) {
            return Transition::Superseded;
        }

        if let Err(e) = self.backend.advance_workflow(request_id).await {
            tracing::warn!(
                error = %e,
                generation,
                "Workflow advance failed; continuing with SMS"
            );
        }

        self.finish(generation, |session| {
            session.state = VerificationState::AwaitingSmsCode;
            session.message = Some(message.to_string());
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionSnapshot> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Apply an intermediate step; false when the attempt was superseded
    fn update(&self, generation: u64, step: impl FnOnce(&mut SessionSnapshot)) -> bool {
        let mut session = self.lock();
        if session.generation != generation {
            return false;
        }
        step(&mut session);
        true
    }

    /// Apply the final step of a call and clear `busy`
    fn finish(&self, generation: u64, step: impl FnOnce(&mut SessionSnapshot)) -> Transition {
        let mut session = self.lock();
        if session.generation != generation {
            tracing::debug!(
                generation,
                current = session.generation,
                "Discarding result of superseded attempt"
            );
            return Transition::Superseded;
        }
        step(&mut session);
        session.busy = false;
        Transition::Applied(session.state)
    }
}
