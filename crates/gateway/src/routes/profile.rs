use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use ourstreet_database::ProfileWithIdentity;
use ourstreet_users::ProfilePatch;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{util::require_session, ApiError, AppState};

const FETCH_FAILED: &str = "Failed to fetch profile";
const UPDATE_FAILED: &str = "Failed to update profile";
const DELETE_FAILED: &str = "Failed to delete account";

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: ProfileWithIdentity,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "Profile",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Profile joined with identity fields", body = ProfileResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to fetch profile", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let session = require_session(&state, &headers)?;

    let profile = state
        .profiles()
        .get_or_create(session.user_id)
        .await
        .map_err(|err| ApiError::operation(FETCH_FAILED, err))?;

    Ok(Json(ProfileResponse {
        success: true,
        message: None,
        data: profile,
    }))
}

/// The body is parsed only after the session check so that a 401 always
/// wins over a malformed payload.
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = "Profile",
    security(("bearerAuth" = [])),
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to update profile", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProfileResponse>, ApiError> {
    let session = require_session(&state, &headers)?;

    let patch: ProfilePatch =
        serde_json::from_slice(&body).map_err(|err| ApiError::operation(UPDATE_FAILED, err))?;

    let profile = state
        .profiles()
        .update(session.user_id, &patch)
        .await
        .map_err(|err| ApiError::operation(UPDATE_FAILED, err))?;

    Ok(Json(ProfileResponse {
        success: true,
        message: Some("Profile updated successfully".to_string()),
        data: profile,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/user/profile",
    tag = "Profile",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Account and dependent records removed", body = MessageResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to delete account", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let session = require_session(&state, &headers)?;

    state
        .profiles()
        .delete_account(session.user_id)
        .await
        .map_err(|err| ApiError::operation(DELETE_FAILED, err))?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Account deleted successfully".to_string(),
    }))
}
