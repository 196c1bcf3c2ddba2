//! Profile repository for database operations.

use crate::entities::{ProfileColumn, ProfileWithIdentity, UserProfile};
use crate::types::{bind_value, ColumnWrite, DatabaseResult};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const JOINED_PROFILE_QUERY: &str = r#"
    SELECT p.id, p.user_id, p.phone, p.address, p.city, p.state, p.pincode, p.bio, p.profile_image,
           p.email_notifications, p.push_notifications, p.issue_updates, p.nearby_issues,
           p.weekly_digest, p.critical_alerts, p.resolution_updates, p.comment_replies,
           p.upvote_notifications, p.profile_visibility, p.show_email, p.show_phone,
           p.show_location, p.allow_analytics, p.data_sharing, p.language, p.timezone,
           p.date_format, p.map_provider, p.auto_refresh, p.refresh_interval,
           p.created_at, p.updated_at,
           u.name AS full_name, u.email AS email, u.avatar AS avatar
    FROM user_profiles p
    INNER JOIN users u ON u.id = p.user_id
    WHERE p.user_id = ?
"#;

#[derive(Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Profile joined with the owning user's name, email and avatar.
    pub async fn find_with_identity(&self, user_id: i64) -> DatabaseResult<Option<ProfileWithIdentity>> {
        let row = sqlx::query(JOINED_PROFILE_QUERY)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_joined_profile).transpose()
    }

    /// Materialise the default profile row. Returns `false` when a row already existed.
    pub async fn insert_default(&self, user_id: i64) -> DatabaseResult<bool> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO user_profiles (user_id, created_at, updated_at) VALUES (?, ?, ?) ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert or update the listed columns keyed by `user_id`, stamping `updated_at`.
    /// Columns not listed keep their current (or default) values.
    pub async fn upsert(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<ProfileColumn>],
    ) -> DatabaseResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let columns: Vec<&str> = writes.iter().map(|write| write.column.as_str()).collect();
        let placeholders = vec!["?"; columns.len() + 2].join(", ");
        let assignments = columns
            .iter()
            .map(|column| format!("{column} = excluded.{column}"))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "INSERT INTO user_profiles (user_id, {}, updated_at) VALUES ({placeholders}) \
             ON CONFLICT(user_id) DO UPDATE SET {assignments}, updated_at = excluded.updated_at",
            columns.join(", "),
        );

        let mut query = sqlx::query(&sql).bind(user_id);
        for write in writes {
            query = bind_value(query, &write.value);
        }
        query
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_for_user(&self, user_id: i64) -> DatabaseResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn map_joined_profile(row: &SqliteRow) -> DatabaseResult<ProfileWithIdentity> {
    let profile = UserProfile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        pincode: row.try_get("pincode")?,
        bio: row.try_get("bio")?,
        profile_image: row.try_get("profile_image")?,
        email_notifications: row.try_get("email_notifications")?,
        push_notifications: row.try_get("push_notifications")?,
        issue_updates: row.try_get("issue_updates")?,
        nearby_issues: row.try_get("nearby_issues")?,
        weekly_digest: row.try_get("weekly_digest")?,
        critical_alerts: row.try_get("critical_alerts")?,
        resolution_updates: row.try_get("resolution_updates")?,
        comment_replies: row.try_get("comment_replies")?,
        upvote_notifications: row.try_get("upvote_notifications")?,
        profile_visibility: row.try_get("profile_visibility")?,
        show_email: row.try_get("show_email")?,
        show_phone: row.try_get("show_phone")?,
        show_location: row.try_get("show_location")?,
        allow_analytics: row.try_get("allow_analytics")?,
        data_sharing: row.try_get("data_sharing")?,
        language: row.try_get("language")?,
        timezone: row.try_get("timezone")?,
        date_format: row.try_get("date_format")?,
        map_provider: row.try_get("map_provider")?,
        auto_refresh: row.try_get("auto_refresh")?,
        refresh_interval: row.try_get("refresh_interval")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    };

    Ok(ProfileWithIdentity {
        profile,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        avatar: row.try_get("avatar")?,
    })
}
