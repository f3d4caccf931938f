//! Domain entities. All of them are transient; nothing is persisted.

pub mod callback;
pub mod verification;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use callback::CallbackEvent;
pub use verification::{
    CodeSubmission, NewVerification, VerificationOutcome, VerificationRequest, WorkflowAdvance,
    COMPLETED_STATUS, INVALID_CODE_STATUS,
};
