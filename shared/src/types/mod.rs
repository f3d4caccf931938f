//! Common type definitions shared between the orchestrator and its clients

pub mod verification;

pub use verification::{CallbackAck, CheckCodeResponse, StartVerificationResponse};
