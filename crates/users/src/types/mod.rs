//! Shared types for the user services.

pub mod errors;
pub mod patch;

pub use errors::{ServiceError, ServiceResult};
pub use patch::ProfilePatch;
