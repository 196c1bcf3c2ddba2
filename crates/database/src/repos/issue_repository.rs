//! Issue repository for database operations.

use crate::entities::{CreateIssueRequest, Issue, IssueStatus};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const ISSUE_COLUMNS: &str = "public_id, user_id, title, description, category, status, latitude, longitude, address, image_url, upvotes, created_at, updated_at";

#[derive(Clone)]
pub struct IssueRepository {
    pool: SqlitePool,
}

impl IssueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every issue reported by `user_id`, in insertion order.
    pub async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Vec<Issue>> {
        let rows = sqlx::query(&format!(
            "SELECT {ISSUE_COLUMNS} FROM issues WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_issue).collect()
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<Issue>> {
        let row = sqlx::query(&format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_issue).transpose()
    }

    pub async fn create(&self, user_id: i64, request: &CreateIssueRequest) -> DatabaseResult<Issue> {
        let public_id = cuid2::cuid();
        let created_at = request.created_at.unwrap_or_else(Utc::now);

        sqlx::query(
            r#"
            INSERT INTO issues (public_id, user_id, title, description, category, status,
                                latitude, longitude, address, image_url, upvotes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&public_id)
        .bind(user_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.category)
        .bind(request.status.as_str())
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.address)
        .bind(&request.image_url)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        self.find_by_public_id(&public_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("issue {public_id}")))
    }

    pub async fn update_status(&self, public_id: &str, status: IssueStatus) -> DatabaseResult<()> {
        let result = sqlx::query("UPDATE issues SET status = ?, updated_at = ? WHERE public_id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("issue {public_id}")));
        }
        Ok(())
    }

    /// Record an upvote. Voting twice on the same issue is a no-op.
    pub async fn add_vote(&self, issue_public_id: &str, user_id: i64) -> DatabaseResult<()> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO issue_votes (issue_id, user_id, created_at)
            SELECT id, ?, ? FROM issues WHERE public_id = ?
            ON CONFLICT(issue_id, user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(Utc::now().to_rfc3339())
        .bind(issue_public_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() > 0 {
            sqlx::query("UPDATE issues SET upvotes = upvotes + 1 WHERE public_id = ?")
                .bind(issue_public_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn map_issue(row: &SqliteRow) -> DatabaseResult<Issue> {
    let status: String = row.try_get("status")?;
    let status = status.parse::<IssueStatus>().map_err(DatabaseError::InvalidValue)?;

    Ok(Issue {
        id: row.try_get("public_id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        status,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        address: row.try_get("address")?,
        image_url: row.try_get("image_url")?,
        upvotes: row.try_get("upvotes")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
