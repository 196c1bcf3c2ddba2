//! User entity definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Canonical identity of an OurStreet account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub name: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

/// Request for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
    pub role: UserRole,
}

/// Role carried by an account and by every session issued for it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns of `users` writable through a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityColumn {
    Name,
}

impl IdentityColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityColumn::Name => "name",
        }
    }
}
