use chrono::{Duration, Utc};
use http_body_util::BodyExt;

use axum::{
    body::Body,
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        Method, Request, StatusCode,
    },
    Router,
};
use ourstreet_config::{AppConfig, DatabaseConfig};
use ourstreet_database::{
    initialize_database, CreateIssueRequest, IssueRepository, IssueStatus, SqlitePool,
};
use ourstreet_gateway::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

type TestResult<T = ()> = anyhow::Result<T>;

struct TestContext {
    _temp_dir: TempDir,
    pool: SqlitePool,
    state: AppState,
    origins: Vec<String>,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        Self::with_origins(Vec::new()).await
    }

    async fn with_origins(origins: Vec<String>) -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("gateway.sqlite");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 5,
        };
        let pool = initialize_database(&config).await?;
        let state = AppState::new(pool.clone(), &AppConfig::default());

        Ok(Self {
            _temp_dir: temp_dir,
            pool,
            state,
            origins,
        })
    }

    fn router(&self) -> Router {
        build_router(self.state.clone(), &self.origins)
    }

    async fn send(&self, request: Request<Body>) -> TestResult<(StatusCode, Value)> {
        let response = self.router().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    async fn sign_up(&self, name: &str, email: &str) -> TestResult<(i64, String)> {
        let user = self
            .state
            .authenticator()
            .register_with_password(Some(name), email, "hunter22")
            .await?;
        let outcome = self
            .state
            .authenticator()
            .login_with_password(email, "hunter22")
            .await?;
        Ok((user.id, outcome.token.token))
    }

    async fn report(&self, user_id: i64, category: &str, status: IssueStatus, age_minutes: i64) -> TestResult<String> {
        let issue = IssueRepository::new(self.pool.clone())
            .create(
                user_id,
                &CreateIssueRequest {
                    title: format!("{category} issue"),
                    description: "reported in tests".into(),
                    category: category.into(),
                    status,
                    created_at: Some(Utc::now() - Duration::minutes(age_minutes)),
                    ..Default::default()
                },
            )
            .await?;
        Ok(issue.id)
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method(Method::GET).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method(Method::DELETE).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: Method, uri: &str, token: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    with_auth(Request::builder().method(method).uri(uri), token)
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

#[tokio::test]
async fn health_reports_ok() -> TestResult {
    let ctx = TestContext::new().await?;
    let (status, body) = ctx.send(get("/health", None)).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn protected_endpoints_reject_missing_session_without_touching_storage() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.pool.close().await;

    let requests = vec![
        get("/api/user/issues", None),
        get("/api/user/profile", None),
        send_json(Method::PUT, "/api/user/profile", None, "{not json"),
        delete("/api/user/profile", None),
        get("/api/auth/me", Some("garbage")),
        get("/api/voice/agent", None),
    ];

    for request in requests {
        let (status, body) = ctx.send(request).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "success": false, "error": "Unauthorized" }));
    }
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user_id, _) = ctx.sign_up("Asha", "asha@example.com").await?;
    let user = ctx.state.authenticator().user_profile(user_id).await?;
    let stale = ctx
        .state
        .authenticator()
        .tokens()
        .issue_at(&user, Utc::now() - Duration::days(3))?;

    let (status, _) = ctx.send(get("/api/user/profile", Some(&stale.token))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn issues_are_filtered_and_sorted_newest_first() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user_id, token) = ctx.sign_up("Asha", "asha@example.com").await?;
    let (other_id, _) = ctx.sign_up("Ravi", "ravi@example.com").await?;

    let oldest = ctx.report(user_id, "roads", IssueStatus::Open, 30).await?;
    let newest = ctx.report(user_id, "roads", IssueStatus::Open, 1).await?;
    ctx.report(user_id, "lighting", IssueStatus::Resolved, 10).await?;
    ctx.report(other_id, "roads", IssueStatus::Open, 5).await?;

    let (status, body) = ctx.send(get("/api/user/issues", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["filtered"], false);
    assert_eq!(body["meta"]["filters"], json!({ "status": null, "category": null }));
    assert_eq!(body["data"][0]["id"], newest);

    let (_, body) = ctx
        .send(get("/api/user/issues?status=open&category=roads", Some(&token)))
        .await?;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![newest.as_str(), oldest.as_str()]);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["filtered"], true);
    assert_eq!(body["meta"]["filters"], json!({ "status": "open", "category": "roads" }));
    assert!(body["data"][0]["createdAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn empty_filters_count_as_absent() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user_id, token) = ctx.sign_up("Asha", "asha@example.com").await?;
    ctx.report(user_id, "roads", IssueStatus::InProgress, 1).await?;

    let (_, body) = ctx
        .send(get("/api/user/issues?status=&category=", Some(&token)))
        .await?;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["filters"]["status"], Value::Null);

    let (_, body) = ctx
        .send(get("/api/user/issues?status=In-Progress", Some(&token)))
        .await?;
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["meta"]["filtered"], true);
    Ok(())
}

#[tokio::test]
async fn repeated_filter_params_use_first_value_after_session_check() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user_id, token) = ctx.sign_up("Asha", "asha@example.com").await?;
    let open = ctx.report(user_id, "roads", IssueStatus::Open, 2).await?;
    ctx.report(user_id, "roads", IssueStatus::Closed, 1).await?;

    let uri = "/api/user/issues?status=open&status=closed";

    let (status, body) = ctx.send(get(uri, None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "success": false, "error": "Unauthorized" }));

    let (status, body) = ctx.send(get(uri, Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["filters"]["status"], "open");
    assert_eq!(body["data"][0]["id"], open);
    Ok(())
}

#[tokio::test]
async fn first_profile_read_creates_defaults() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, token) = ctx.sign_up("Asha", "asha@example.com").await?;

    let (status, body) = ctx.send(get("/api/user/profile", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["full_name"], "Asha");
    assert_eq!(data["email"], "asha@example.com");
    assert_eq!(data["email_notifications"], true);
    assert_eq!(data["weekly_digest"], false);
    assert_eq!(data["profile_visibility"], "public");
    assert_eq!(data["refresh_interval"], 30);
    assert!(body.get("message").is_none());

    let (_, again) = ctx.send(get("/api/user/profile", Some(&token))).await?;
    assert_eq!(again["data"]["id"], data["id"]);
    Ok(())
}

#[tokio::test]
async fn profile_update_is_partial() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, token) = ctx.sign_up("Asha", "asha@example.com").await?;

    let payload = json!({
        "full_name": "Asha Rao",
        "city": "Panaji",
        "weekly_digest": true,
        "refresh_interval": 60
    });
    let (status, body) = ctx
        .send(send_json(Method::PUT, "/api/user/profile", Some(&token), payload.to_string()))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["data"]["full_name"], "Asha Rao");
    assert_eq!(body["data"]["city"], "Panaji");
    assert_eq!(body["data"]["weekly_digest"], true);
    assert_eq!(body["data"]["refresh_interval"], 60);
    assert_eq!(body["data"]["language"], "en");

    let (_, body) = ctx
        .send(send_json(
            Method::PUT,
            "/api/user/profile",
            Some(&token),
            json!({ "city": null, "language": null }).to_string(),
        ))
        .await?;
    assert_eq!(body["data"]["city"], Value::Null);
    assert_eq!(body["data"]["language"], "en");
    assert_eq!(body["data"]["full_name"], "Asha Rao");
    Ok(())
}

#[tokio::test]
async fn malformed_profile_body_is_an_operation_error() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, token) = ctx.sign_up("Asha", "asha@example.com").await?;

    let (status, body) = ctx
        .send(send_json(Method::PUT, "/api/user/profile", Some(&token), "{not json"))
        .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Failed to update profile" }));
    Ok(())
}

#[tokio::test]
async fn deleting_account_cascades() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user_id, token) = ctx.sign_up("Asha", "asha@example.com").await?;
    ctx.report(user_id, "roads", IssueStatus::Open, 1).await?;
    ctx.send(get("/api/user/profile", Some(&token))).await?;

    let (status, body) = ctx.send(delete("/api/user/profile", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Account deleted successfully" }));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM issues")
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(remaining, 0);

    let (status, _) = ctx.send(get("/api/auth/me", Some(&token))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn register_login_and_me() -> TestResult {
    let ctx = TestContext::new().await?;

    let register = json!({ "name": "Asha", "email": "asha@example.com", "password": "hunter22" });
    let (status, body) = ctx
        .send(send_json(Method::POST, "/api/auth/register", None, register.to_string()))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "asha@example.com");
    assert_eq!(body["data"]["role"], "user");

    let (status, body) = ctx
        .send(send_json(Method::POST, "/api/auth/register", None, register.to_string()))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let wrong = json!({ "email": "asha@example.com", "password": "nope" });
    let (status, _) = ctx
        .send(send_json(Method::POST, "/api/auth/login", None, wrong.to_string()))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let login = json!({ "email": "asha@example.com", "password": "hunter22" });
    let (status, body) = ctx
        .send(send_json(Method::POST, "/api/auth/login", None, login.to_string()))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = ctx.send(get("/api/auth/me", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Asha");
    Ok(())
}

#[tokio::test]
async fn voice_agent_comes_from_configuration() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, token) = ctx.sign_up("Asha", "asha@example.com").await?;

    let (status, body) = ctx.send(get("/api/voice/agent", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["agentId"], ourstreet_config::DEFAULT_AGENT_ID);
    assert_eq!(body["data"]["name"], "City Assistant");
    assert_eq!(body["data"]["connectionType"], "webrtc");
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_routes() -> TestResult {
    let ctx = TestContext::new().await?;
    let (status, body) = ctx.send(get("/api-docs/openapi.json", None)).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/user/profile"]["put"].is_object());
    assert!(body["paths"]["/api/user/issues"]["get"].is_object());
    assert!(body["components"]["securitySchemes"]["bearerAuth"].is_object());
    Ok(())
}

#[tokio::test]
async fn cors_allows_configured_origin() -> TestResult {
    let ctx = TestContext::with_origins(vec!["http://localhost:3000".into()]).await?;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/user/profile")
        .header(ORIGIN, "http://localhost:3000")
        .header(ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())?;
    let response = ctx.router().oneshot(request).await?;

    assert_eq!(
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    Ok(())
}
