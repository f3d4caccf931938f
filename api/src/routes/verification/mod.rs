//! Verification route handlers
//!
//! - `POST /verification` opens a request (silent auth, then SMS)
//! - `POST /check-code` checks a silent-auth or SMS code
//! - `POST /next` moves a request to its next channel
//! - `POST /callback` receives provider status events

pub mod callback;
pub mod check_code;
pub mod next;
pub mod start;

use std::sync::Arc;

use sv_core::services::{VerificationProvider, VerificationService};

pub use callback::{callback, CALLBACK_BODY_LIMIT};
pub use check_code::check_code;
pub use next::next_workflow;
pub use start::start_verification;

/// Application state that holds shared services
pub struct AppState<P: VerificationProvider + ?Sized> {
    pub verification_service: Arc<VerificationService<P>>,
}

impl<P: VerificationProvider + ?Sized> AppState<P> {
    pub fn new(verification_service: VerificationService<P>) -> Self {
        Self {
            verification_service: Arc::new(verification_service),
        }
    }
}
