//! User repository for database operations.

use crate::entities::{CreateUserRequest, IdentityColumn, User, UserRole};
use crate::types::{bind_value, ColumnWrite, DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str = "id, public_id, name, email, avatar, role, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Create new user
    pub async fn create(&self, request: &CreateUserRequest) -> DatabaseResult<User> {
        let now = Utc::now().to_rfc3339();
        let public_id = cuid2::cuid();

        let result = sqlx::query(
            "INSERT INTO users (public_id, name, email, avatar, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.avatar)
        .bind(request.role.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {user_id}")))
    }

    /// Apply a partial update to the `users` row. An empty write list is a no-op.
    pub async fn update_columns(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<IdentityColumn>],
    ) -> DatabaseResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let set_clause = writes
            .iter()
            .map(|write| format!("{} = ?", write.column.as_str()))
            .chain(std::iter::once("updated_at = ?".to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE users SET {set_clause} WHERE id = ?");

        let mut query = sqlx::query(&sql);
        for write in writes {
            query = bind_value(query, &write.value);
        }
        query
            .bind(Utc::now().to_rfc3339())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove the user. Profiles, identities, issues and votes go with it.
    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub(crate) fn map_user(row: &SqliteRow) -> DatabaseResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        avatar: row.try_get("avatar")?,
        role: UserRole::from(row.try_get::<String, _>("role")?.as_str()),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
