use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;

use ourstreet_config::AuthConfig;
use ourstreet_database::{DatabaseError, IdentityRepository, User, UserRepository, PASSWORD_PROVIDER};

mod token;

pub use ourstreet_database::UserRole;
pub use token::{Claims, IssuedToken, TokenManager};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    #[error("session expired")]
    TokenExpired,
    #[error("user not found")]
    UnknownUser,
    #[error("token creation failed: {0}")]
    TokenCreation(String),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: User,
}

#[derive(Clone)]
pub struct Authenticator {
    pool: SqlitePool,
    users: UserRepository,
    identities: IdentityRepository,
    tokens: TokenManager,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            identities: IdentityRepository::new(pool.clone()),
            tokens: TokenManager::new(&config),
            pool,
        }
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Resolve a bearer token to its session. Never touches the database.
    pub fn resolve_session(&self, token: &str) -> Result<SessionUser, AuthError> {
        let session = self.tokens.resolve(token)?;
        debug!(user_id = session.user_id, "resolved session");
        Ok(session)
    }

    pub async fn register_with_password(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::InvalidInput("email is required"));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password is required"));
        }

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            return Err(AuthError::UserExists);
        }

        let now = Utc::now().to_rfc3339();
        let password_hash = hash_password(password)?;
        let name = name.map(str::trim).filter(|value| !value.is_empty());

        let user_id = sqlx::query(
            "INSERT INTO users (public_id, name, email, avatar, role, created_at, updated_at) VALUES (?, ?, ?, NULL, ?, ?, ?)",
        )
        .bind(cuid2::cuid())
        .bind(name)
        .bind(email)
        .bind(UserRole::User.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query(
            "INSERT INTO user_identities (user_id, provider, provider_uid, secret, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(PASSWORD_PROVIDER)
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let user = self.user_profile(user_id).await?;
        info!(user = %user.public_id, "registered password account");
        Ok(user)
    }

    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let Some((user, secret)) = self
            .identities
            .find_user_with_secret(PASSWORD_PROVIDER, email.trim())
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        let secret = secret.ok_or(AuthError::InvalidCredentials)?;
        let stored_hash = PasswordHash::new(&secret)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &stored_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(&user)?;
        info!(user = %user.public_id, "password login");
        Ok(LoginOutcome { token, user })
    }

    pub async fn user_profile(&self, user_id: i64) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownUser)
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_password_uses_random_salt_per_call() {
        let first = hash_password("s3cret").unwrap();
        let second = hash_password("s3cret").unwrap();

        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second);
    }
}
