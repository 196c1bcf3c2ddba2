use serde::{Deserialize, Serialize};

/// Provider name for email + password credentials.
pub const PASSWORD_PROVIDER: &str = "password";

/// Sign-in credential attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub user_id: i64,
    pub provider: String,
    pub provider_uid: String,
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
