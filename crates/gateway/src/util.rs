use axum::http::{header::AUTHORIZATION, HeaderMap};
use ourstreet_auth::SessionUser;
use tracing::debug;

use crate::{ApiError, AppState};

pub fn require_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            debug!("missing authorization header");
            ApiError::unauthorized()
        })?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !scheme.eq_ignore_ascii_case("Bearer") {
        debug!("invalid authorization scheme");
        return Err(ApiError::unauthorized());
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        debug!("missing bearer token");
        return Err(ApiError::unauthorized());
    }

    Ok(token.to_string())
}

/// Resolve the caller's session. Every failure is a uniform 401.
pub fn require_session(state: &AppState, headers: &HeaderMap) -> Result<SessionUser, ApiError> {
    let token = require_bearer(headers)?;
    state.authenticator().resolve_session(&token).map_err(|err| {
        debug!(error = %err, "rejected session token");
        ApiError::unauthorized()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn require_bearer_extracts_token_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer TOKEN123"));

        let token = require_bearer(&headers).expect("token should be extracted");
        assert_eq!(token, "TOKEN123");
    }

    #[test]
    fn require_bearer_rejects_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));

        let error = require_bearer(&headers).expect_err("should reject missing token");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error.message, "Unauthorized");
    }

    #[test]
    fn require_bearer_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert!(require_bearer(&headers).is_err());
        assert!(require_bearer(&HeaderMap::new()).is_err());
    }
}
