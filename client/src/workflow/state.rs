//! Session state of one verification attempt

use std::fmt;

pub const MSG_UNABLE_TO_VERIFY: &str = "Unable to verify. Please try again.";
pub const MSG_VERIFIED_SILENT_AUTH: &str = "Verified via Silent Auth.";
pub const MSG_FALLBACK_TO_SMS: &str = "Fallback to SMS";
pub const MSG_SILENT_AUTH_FAILED: &str = "Silent Auth failed, please enter SMS code";
pub const MSG_VERIFIED_SMS: &str = "Verified via SMS";
pub const MSG_INVALID_SMS_CODE: &str = "Invalid SMS code";

/// How the number was verified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifiedVia {
    SilentAuth,
    Sms,
}

/// Where the attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationState {
    #[default]
    Idle,
    /// Request opened; the check URL is being polled
    AwaitingSilentAuth,
    /// The silent-auth code is being checked
    SilentAuthResult,
    /// Waiting for the user to type the SMS code
    AwaitingSmsCode,
    Verified(VerifiedVia),
    /// Last SMS code was rejected; another one may be submitted
    Invalid,
}

impl VerificationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationState::Verified(_))
    }

    /// States in which a typed SMS code can be submitted
    pub fn accepts_sms_code(&self) -> bool {
        matches!(
            self,
            VerificationState::AwaitingSmsCode | VerificationState::Invalid
        )
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationState::Idle => write!(f, "idle"),
            VerificationState::AwaitingSilentAuth => write!(f, "awaiting_silent_auth"),
            VerificationState::SilentAuthResult => write!(f, "silent_auth_result"),
            VerificationState::AwaitingSmsCode => write!(f, "awaiting_sms_code"),
            VerificationState::Verified(VerifiedVia::SilentAuth) => write!(f, "verified_silent_auth"),
            VerificationState::Verified(VerifiedVia::Sms) => write!(f, "verified_sms"),
            VerificationState::Invalid => write!(f, "invalid"),
        }
    }
}

/// The request the attempt is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRequest {
    pub request_id: String,
    pub check_url: Option<String>,
}

/// Everything the sign-in screen renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Bumped on every new attempt
    pub generation: u64,
    pub phone: String,
    pub request: Option<ActiveRequest>,
    pub state: VerificationState,
    /// Last status line shown to the user
    pub message: Option<String>,
    /// A begin or submit call is outstanding
    pub busy: bool,
}

/// Result of a controller call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The call's outcome was written to the session
    Applied(VerificationState),
    /// A newer attempt started meanwhile; the outcome was discarded
    Superseded,
}
