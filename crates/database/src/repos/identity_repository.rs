//! Sign-in credentials attached to users.

use crate::entities::{User, UserIdentity};
use crate::repos::user_repository::map_user;
use crate::types::DatabaseResult;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        provider: &str,
        provider_uid: &str,
        secret: Option<&str>,
    ) -> DatabaseResult<UserIdentity> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO user_identities (user_id, provider, provider_uid, secret, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(provider)
        .bind(provider_uid)
        .bind(secret)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(UserIdentity {
            id: result.last_insert_rowid(),
            user_id,
            provider: provider.to_string(),
            provider_uid: provider_uid.to_string(),
            secret: secret.map(str::to_string),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Look up the user behind a provider credential together with its stored secret.
    pub async fn find_user_with_secret(
        &self,
        provider: &str,
        provider_uid: &str,
    ) -> DatabaseResult<Option<(User, Option<String>)>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.public_id, u.name, u.email, u.avatar, u.role, u.created_at, u.updated_at,
                   i.secret AS secret
            FROM user_identities i
            INNER JOIN users u ON u.id = i.user_id
            WHERE i.provider = ? AND i.provider_uid = ?
            "#,
        )
        .bind(provider)
        .bind(provider_uid)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let user = map_user(&row)?;
                let secret: Option<String> = row.try_get("secret")?;
                Ok(Some((user, secret)))
            }
            None => Ok(None),
        }
    }
}
