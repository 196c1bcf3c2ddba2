//! HTTP surface of the OurStreet backend.
//!
//! Every handler resolves the caller's session first; an absent or invalid
//! token is a uniform `401 { success: false, error: "Unauthorized" }` and the
//! request never reaches storage. Operation failures are logged and answered
//! with a generic 500 message.

mod docs;
mod error;
mod middleware;
mod state;
mod util;

pub mod routes;

pub use docs::ApiDoc;
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
pub use util::{require_bearer, require_session};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/api/auth/register", axum::routing::post(routes::auth::register))
        .route("/api/auth/login", axum::routing::post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/user/issues", get(routes::issues::list_user_issues))
        .route(
            "/api/user/profile",
            get(routes::profile::get_profile)
                .put(routes::profile::update_profile)
                .delete(routes::profile::delete_profile),
        )
        .route("/api/voice/agent", get(routes::voice::voice_agent))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
