//! Storage seams for the user services.
//!
//! The services are generic over these traits so tests can swap the
//! SQLite repositories for in-memory doubles.

use ourstreet_database::{
    ColumnWrite, DatabaseResult, IdentityColumn, Issue, IssueRepository, ProfileColumn,
    ProfileRepository, ProfileWithIdentity, SqlitePool, UserRepository,
};

pub trait IssueStore {
    async fn issues_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Issue>>;
}

pub trait ProfileStore {
    async fn find_profile(&self, user_id: i64) -> DatabaseResult<Option<ProfileWithIdentity>>;
    /// Returns `false` when the row already existed.
    async fn insert_default_profile(&self, user_id: i64) -> DatabaseResult<bool>;
    async fn update_identity(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<IdentityColumn>],
    ) -> DatabaseResult<()>;
    async fn upsert_profile(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<ProfileColumn>],
    ) -> DatabaseResult<()>;
    async fn delete_user(&self, user_id: i64) -> DatabaseResult<()>;
}

impl IssueStore for IssueRepository {
    async fn issues_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Issue>> {
        self.find_by_user_id(user_id).await
    }
}

/// Profile storage backed by the `users` and `user_profiles` tables.
#[derive(Clone)]
pub struct SqliteProfileStore {
    users: UserRepository,
    profiles: ProfileRepository,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool),
        }
    }
}

impl ProfileStore for SqliteProfileStore {
    async fn find_profile(&self, user_id: i64) -> DatabaseResult<Option<ProfileWithIdentity>> {
        self.profiles.find_with_identity(user_id).await
    }

    async fn insert_default_profile(&self, user_id: i64) -> DatabaseResult<bool> {
        self.profiles.insert_default(user_id).await
    }

    async fn update_identity(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<IdentityColumn>],
    ) -> DatabaseResult<()> {
        self.users.update_columns(user_id, writes).await
    }

    async fn upsert_profile(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<ProfileColumn>],
    ) -> DatabaseResult<()> {
        self.profiles.upsert(user_id, writes).await
    }

    async fn delete_user(&self, user_id: i64) -> DatabaseResult<()> {
        self.users.delete(user_id).await
    }
}
