//! Sign-in workflow: session state and the controller driving it

pub mod controller;
pub mod state;

#[cfg(test)]
mod tests;

pub use controller::WorkflowController;
pub use state::{
    ActiveRequest, SessionSnapshot, Transition, VerificationState, VerifiedVia,
    MSG_FALLBACK_TO_SMS, MSG_INVALID_SMS_CODE, MSG_SILENT_AUTH_FAILED, MSG_UNABLE_TO_VERIFY,
    MSG_VERIFIED_SILENT_AUTH, MSG_VERIFIED_SMS,
};
