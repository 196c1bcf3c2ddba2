//! Navigation shell model.
//!
//! Everything here is a pure function of the current path and the viewer's
//! authentication state; renderers only draw what these functions return.

mod guard;
mod menu;

pub use guard::{guard_route, login_redirect, RouteDecision, DEFAULT_REDIRECT, LOGIN_PATH};
pub use menu::{build_navigation, AccountControl, NavItem, Navigation, Route, PRIMARY_ITEMS};

use ourstreet_database::UserRole;

/// The signed-in user as far as navigation is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub name: Option<String>,
    pub role: UserRole,
}

/// Explicit authentication context handed to every component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub viewer: Option<Viewer>,
    /// The session is still being resolved.
    pub loading: bool,
}

impl AuthContext {
    pub fn loading() -> Self {
        Self {
            viewer: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(viewer: Viewer) -> Self {
        Self {
            viewer: Some(viewer),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.viewer
            .as_ref()
            .map(|viewer| viewer.role.is_admin())
            .unwrap_or(false)
    }
}
