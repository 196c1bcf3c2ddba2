use axum::{extract::State, http::HeaderMap, Json};
use ourstreet_voice::AgentProfile;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{util::require_session, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentResponse {
    pub success: bool,
    pub data: AgentProfile,
}

#[utoipa::path(
    get,
    path = "/api/voice/agent",
    tag = "Voice",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Voice agent the client should connect to", body = AgentResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn voice_agent(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AgentResponse>, ApiError> {
    require_session(&state, &headers)?;

    Ok(Json(AgentResponse {
        success: true,
        data: state.agent().clone(),
    }))
}
