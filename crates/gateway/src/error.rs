use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ourstreet_auth::AuthError;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

pub const UNAUTHORIZED: &str = "Unauthorized";

/// Body of every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Log `cause` and answer with a generic 500 that does not leak it.
    pub fn operation<E>(message: &'static str, cause: E) -> Self
    where
        E: std::fmt::Debug,
    {
        error!(error = ?cause, "{message}");
        Self::internal_server_error(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::UserExists => Self::conflict("User already exists"),
            AuthError::InvalidInput(message) => Self::bad_request(message),
            AuthError::InvalidCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
            AuthError::InvalidToken(_) | AuthError::TokenExpired => Self::unauthorized(),
            AuthError::UnknownUser => Self::not_found("User not found"),
            other => Self::operation("Internal server error", other),
        }
    }
}
