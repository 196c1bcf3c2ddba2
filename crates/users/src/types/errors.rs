//! Error types for the user services.

use ourstreet_database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// The joined profile could not be read back after it should exist.
    #[error("profile for user {0} not found")]
    ProfileMissing(i64),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
