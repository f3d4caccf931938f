//! Value objects representing immutable domain concepts.

pub mod channel;
pub mod request_id;

// Re-export commonly used types
pub use channel::{default_workflow, Channel};
pub use request_id::RequestId;
