//! # Silent Verify Client
//!
//! Controller behind the sign-in screen. Drives one verification attempt:
//! start → silent-auth probe → code check, falling back to an SMS code when
//! silent authentication is unavailable or fails.
//!
//! The orchestrator and the check URL sit behind the [`VerifyBackend`] and
//! [`SilentAuthClient`] traits so that the controller can be exercised
//! without a network.

pub mod backend;
pub mod config;
pub mod error;
pub mod silent_auth;
pub mod workflow;

pub use backend::{HttpBackend, VerifyBackend};
pub use config::ClientConfig;
pub use error::ClientError;
pub use silent_auth::{HttpSilentAuthClient, SilentAuthClient, SilentAuthProbe};
pub use workflow::{
    SessionSnapshot, Transition, VerificationState, VerifiedVia, WorkflowController,
};
