use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use ourstreet_database::Issue;
use ourstreet_users::IssueFilter;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{util::require_session, ApiError, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IssueQuery {
    /// Exact status match (`open`, `in-progress`, `resolved`, `closed`).
    pub status: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
}

impl IssueQuery {
    /// Keeps the first occurrence of each filter; repeated keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "status" if query.status.is_none() => query.status = Some(value),
                "category" if query.category.is_none() => query.category = Some(value),
                _ => {}
            }
        }
        query
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IssuesMeta {
    pub total: usize,
    pub filtered: bool,
    pub filters: IssueFilter,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IssuesResponse {
    pub success: bool,
    pub data: Vec<Issue>,
    pub meta: IssuesMeta,
}

#[utoipa::path(
    get,
    path = "/api/user/issues",
    tag = "Issues",
    security(("bearerAuth" = [])),
    params(IssueQuery),
    responses(
        (status = 200, description = "Issues reported by the caller, newest first", body = IssuesResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to fetch issues", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_user_issues(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<IssuesResponse>, ApiError> {
    let session = require_session(&state, &headers)?;
    let query = IssueQuery::from_pairs(pairs);
    let filter = IssueFilter::new(query.status, query.category);

    let listing = state
        .issues()
        .list_for_user(session.user_id, filter)
        .await
        .map_err(|err| ApiError::operation("Failed to fetch issues", err))?;

    Ok(Json(IssuesResponse {
        success: true,
        data: listing.issues,
        meta: IssuesMeta {
            total: listing.total,
            filtered: listing.filtered,
            filters: listing.filters,
        },
    }))
}
