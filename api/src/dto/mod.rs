//! Request bodies accepted by the orchestrator

pub mod verification;

pub use verification::{CheckCodeRequest, NextWorkflowRequest, StartVerificationRequest};
pub use sv_shared::{CallbackAck, CheckCodeResponse, ErrorResponse, StartVerificationResponse};
