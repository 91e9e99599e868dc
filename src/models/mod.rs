//! Data models for the software request server

pub mod software_request;
pub mod user;

// Re-export commonly used types
pub use software_request::{DraftListItem, RequestStatus, SoftwareRequest, UpdateOutcome};
pub use user::{Principal, SessionClaims, User};
