use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::issues::list_user_issues,
        crate::routes::profile::get_profile,
        crate::routes::profile::update_profile,
        crate::routes::profile::delete_profile,
        crate::routes::voice::voice_agent
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::auth::RegisterRequest,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::UserResponse,
            crate::routes::auth::UserEnvelope,
            crate::routes::auth::SessionResponse,
            crate::routes::issues::IssuesMeta,
            crate::routes::issues::IssuesResponse,
            crate::routes::profile::ProfileResponse,
            crate::routes::profile::MessageResponse,
            crate::routes::voice::AgentResponse,
            ourstreet_database::Issue,
            ourstreet_database::IssueStatus,
            ourstreet_database::UserProfile,
            ourstreet_database::ProfileWithIdentity,
            ourstreet_database::UserRole,
            ourstreet_users::IssueFilter,
            ourstreet_users::ProfilePatch,
            ourstreet_voice::AgentProfile
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration, login and session lookup"),
        (name = "Issues", description = "Issues reported by the signed-in resident"),
        (name = "Profile", description = "Profile settings and account deletion"),
        (name = "Voice", description = "Voice assistant configuration")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        let schemes = &mut components.security_schemes;

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("JWT".to_string());
        }

        schemes.insert("bearerAuth".to_string(), scheme);
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
