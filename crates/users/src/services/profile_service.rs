//! Read-or-create, partial update and deletion of a resident's profile.

use ourstreet_database::{ProfileWithIdentity, SqlitePool};
use tracing::{debug, info, warn};

use super::field_mapping::WritePlan;
use crate::repositories::{ProfileStore, SqliteProfileStore};
use crate::types::{ProfilePatch, ServiceError, ServiceResult};

pub struct ProfileService<R> {
    store: R,
}

impl ProfileService<SqliteProfileStore> {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(SqliteProfileStore::new(pool))
    }
}

impl<R> ProfileService<R>
where
    R: ProfileStore,
{
    pub fn with_store(store: R) -> Self {
        Self { store }
    }

    /// Return the joined profile, materialising the default row on first read.
    pub async fn get_or_create(&self, user_id: i64) -> ServiceResult<ProfileWithIdentity> {
        if let Some(profile) = self.store.find_profile(user_id).await? {
            return Ok(profile);
        }

        let created = self.store.insert_default_profile(user_id).await?;
        if created {
            info!(user_id, "created default profile");
        } else {
            debug!(user_id, "default profile inserted concurrently");
        }

        self.reload(user_id).await
    }

    /// Apply `patch`: at most one identity write, then at most one profile
    /// upsert, then read the joined record back.
    pub async fn update(&self, user_id: i64, patch: &ProfilePatch) -> ServiceResult<ProfileWithIdentity> {
        let plan = WritePlan::from_patch(patch);

        if !plan.identity.is_empty() {
            self.store.update_identity(user_id, &plan.identity).await?;
        }

        if !plan.profile.is_empty() {
            self.store.upsert_profile(user_id, &plan.profile).await?;
        }

        debug!(
            user_id,
            identity_columns = plan.identity.len(),
            profile_columns = plan.profile.len(),
            "applied profile patch"
        );

        self.reload(user_id).await
    }

    /// Delete the account. Dependent rows are removed by the storage cascade.
    pub async fn delete_account(&self, user_id: i64) -> ServiceResult<()> {
        self.store.delete_user(user_id).await?;
        warn!(user_id, "deleted user account");
        Ok(())
    }

    async fn reload(&self, user_id: i64) -> ServiceResult<ProfileWithIdentity> {
        self.store
            .find_profile(user_id)
            .await?
            .ok_or(ServiceError::ProfileMissing(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock_repositories::MockProfileStore;

    #[tokio::test]
    async fn first_read_creates_exactly_one_default_row() {
        let store = MockProfileStore::with_user(1, "Asha", "asha@example.com");
        let service = ProfileService::with_store(store.clone());

        let profile = service.get_or_create(1).await.unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Asha"));
        assert_eq!(profile.email, "asha@example.com");
        assert!(profile.profile.email_notifications);
        assert_eq!(store.profile_rows().await, 1);
        assert_eq!(store.default_inserts().await, 1);

        service.get_or_create(1).await.unwrap();
        assert_eq!(store.profile_rows().await, 1);
        assert_eq!(store.default_inserts().await, 1);
    }

    #[tokio::test]
    async fn empty_patch_performs_no_writes() {
        let store = MockProfileStore::with_user(1, "Asha", "asha@example.com");
        let service = ProfileService::with_store(store.clone());
        service.get_or_create(1).await.unwrap();

        let profile = service.update(1, &ProfilePatch::default()).await.unwrap();
        assert_eq!(profile.profile.user_id, 1);
        assert_eq!(store.identity_writes().await, 0);
        assert_eq!(store.profile_writes().await, 0);
    }

    #[tokio::test]
    async fn name_and_profile_field_write_twice_identity_first() {
        let store = MockProfileStore::with_user(1, "Asha", "asha@example.com");
        let service = ProfileService::with_store(store.clone());

        let patch = ProfilePatch {
            full_name: Some(Some("Asha Verma".into())),
            city: Some(Some("Bhopal".into())),
            push_notifications: Some(false),
            ..Default::default()
        };
        let profile = service.update(1, &patch).await.unwrap();

        assert_eq!(store.write_log().await, vec!["identity", "profile"]);
        assert_eq!(profile.full_name.as_deref(), Some("Asha Verma"));
        assert_eq!(profile.profile.city.as_deref(), Some("Bhopal"));
        assert!(!profile.profile.push_notifications);
    }

    #[tokio::test]
    async fn update_without_existing_row_upserts_one() {
        let store = MockProfileStore::with_user(1, "Asha", "asha@example.com");
        let service = ProfileService::with_store(store.clone());

        let patch = ProfilePatch {
            language: Some("mr".into()),
            ..Default::default()
        };
        let profile = service.update(1, &patch).await.unwrap();

        assert_eq!(profile.profile.language, "mr");
        assert_eq!(store.profile_rows().await, 1);
    }

    #[tokio::test]
    async fn empty_patch_without_row_reports_missing_profile() {
        let store = MockProfileStore::with_user(1, "Asha", "asha@example.com");
        let service = ProfileService::with_store(store);

        let err = service.update(1, &ProfilePatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::ProfileMissing(1)));
    }

    #[tokio::test]
    async fn failed_identity_write_aborts_before_profile_write() {
        let store = MockProfileStore::with_user(1, "Asha", "asha@example.com");
        store.fail_identity_writes().await;
        let service = ProfileService::with_store(store.clone());

        let patch = ProfilePatch {
            full_name: Some(Some("X".into())),
            bio: Some(Some("hello".into())),
            ..Default::default()
        };
        assert!(service.update(1, &patch).await.is_err());
        assert_eq!(store.profile_writes().await, 0);
    }

    #[tokio::test]
    async fn delete_issues_a_single_delete() {
        let store = MockProfileStore::with_user(1, "Asha", "asha@example.com");
        let service = ProfileService::with_store(store.clone());
        service.get_or_create(1).await.unwrap();

        service.delete_account(1).await.unwrap();
        assert_eq!(store.write_log().await, vec!["delete"]);
        assert_eq!(store.profile_rows().await, 0);
    }
}
