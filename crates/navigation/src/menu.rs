use serde::Serialize;

use crate::AuthContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub href: &'static str,
    pub label: &'static str,
}

/// Primary links, in display order.
pub const PRIMARY_ITEMS: &[Route] = &[
    Route { href: "/", label: "Home" },
    Route { href: "/report", label: "Report Issue" },
    Route { href: "/map", label: "Map" },
    Route { href: "/dashboard", label: "Dashboard" },
    Route { href: "/voice-agent", label: "Voice Agent" },
    Route { href: "/team", label: "Team" },
];

const ADMIN: Route = Route { href: "/admin", label: "Admin" };
const LOGIN: Route = Route { href: "/login", label: "Login" };
const SIGN_UP: Route = Route { href: "/signup", label: "Sign Up" };

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountControl {
    Logout,
    Link {
        href: &'static str,
        label: &'static str,
        emphasized: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub items: Vec<NavItem>,
    pub admin: Option<NavItem>,
    pub account: Vec<AccountControl>,
}

impl Navigation {
    pub fn active(&self) -> Option<&NavItem> {
        self.items.iter().find(|item| item.active)
    }
}

pub fn build_navigation(path: &str, auth: &AuthContext) -> Navigation {
    let item = |route: &Route| NavItem {
        href: route.href,
        label: route.label,
        active: route.href == path,
    };

    let items = PRIMARY_ITEMS.iter().map(item).collect();
    let admin = auth.is_admin().then(|| item(&ADMIN));

    let account = if auth.is_authenticated() {
        vec![AccountControl::Logout]
    } else {
        [LOGIN, SIGN_UP]
            .iter()
            .map(|route| AccountControl::Link {
                href: route.href,
                label: route.label,
                emphasized: route.href == SIGN_UP.href,
            })
            .collect()
    };

    Navigation {
        items,
        admin,
        account,
    }
}
