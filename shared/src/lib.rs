//! Shared utilities and common types for the Silent Verify server and client
//!
//! This crate provides common functionality used across all workspace members:
//! - Configuration types
//! - Error response structures
//! - Wire types exchanged between the client and the orchestrator
//! - Utility functions (phone masking and validation)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{Environment, LogFormat, LoggingConfig, ServerConfig};
pub use errors::{error_codes, ErrorResponse};
pub use types::{CallbackAck, CheckCodeResponse, StartVerificationResponse};
pub use utils::phone;
