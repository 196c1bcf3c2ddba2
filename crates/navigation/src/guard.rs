use crate::AuthContext;

pub const LOGIN_PATH: &str = "/login";
/// Where to return after login when the current path is unknown.
pub const DEFAULT_REDIRECT: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Loading,
    Redirect(String),
    Render,
}

/// Login URL that returns to `path` afterwards.
pub fn login_redirect(path: Option<&str>) -> String {
    let target = path.filter(|path| !path.is_empty()).unwrap_or(DEFAULT_REDIRECT);
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(target))
}

pub fn guard_route(path: Option<&str>, auth: &AuthContext, require_auth: bool) -> RouteDecision {
    if auth.loading {
        return RouteDecision::Loading;
    }
    if require_auth && !auth.is_authenticated() {
        return RouteDecision::Redirect(login_redirect(path));
    }
    RouteDecision::Render
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewer;
    use ourstreet_database::UserRole;

    #[test]
    fn loading_wins_over_everything() {
        assert_eq!(
            guard_route(Some("/dashboard"), &AuthContext::loading(), true),
            RouteDecision::Loading
        );
        assert_eq!(
            guard_route(Some("/"), &AuthContext::loading(), false),
            RouteDecision::Loading
        );
    }

    #[test]
    fn anonymous_viewer_is_redirected_with_encoded_path() {
        let decision = guard_route(Some("/voice-agent"), &AuthContext::anonymous(), true);
        assert_eq!(
            decision,
            RouteDecision::Redirect("/login?redirect=%2Fvoice-agent".into())
        );
    }

    #[test]
    fn missing_path_redirects_to_dashboard() {
        assert_eq!(login_redirect(None), "/login?redirect=%2Fdashboard");
        assert_eq!(login_redirect(Some("")), "/login?redirect=%2Fdashboard");
    }

    #[test]
    fn query_characters_are_encoded() {
        assert_eq!(
            login_redirect(Some("/map?status=open&x=1")),
            "/login?redirect=%2Fmap%3Fstatus%3Dopen%26x%3D1"
        );
    }

    #[test]
    fn public_routes_render_for_anyone() {
        assert_eq!(
            guard_route(Some("/team"), &AuthContext::anonymous(), false),
            RouteDecision::Render
        );
    }

    #[test]
    fn signed_in_viewer_renders() {
        let auth = AuthContext::signed_in(Viewer { name: None, role: UserRole::User });
        assert_eq!(guard_route(Some("/report"), &auth, true), RouteDecision::Render);
    }
}
