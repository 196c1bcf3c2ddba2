//! In-memory store doubles for exercising the services without SQLite

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use ourstreet_database::{
    ColumnValue, ColumnWrite, DatabaseError, DatabaseResult, IdentityColumn, Issue, IssueStatus,
    ProfileColumn, ProfileWithIdentity, UserProfile,
};
use tokio::sync::RwLock;

use crate::repositories::{IssueStore, ProfileStore};

pub fn sample_issue(id: &str, user_id: i64, status: IssueStatus, category: &str, age_minutes: i64) -> Issue {
    let created_at = Utc::now() - Duration::minutes(age_minutes);
    Issue {
        id: id.to_string(),
        user_id,
        title: format!("Issue {id}"),
        description: String::new(),
        category: category.to_string(),
        status,
        latitude: None,
        longitude: None,
        address: None,
        image_url: None,
        upvotes: 0,
        created_at,
        updated_at: created_at,
    }
}

pub struct MockIssueStore {
    issues: Vec<Issue>,
    fail: bool,
}

impl MockIssueStore {
    pub fn with_issues(issues: Vec<Issue>) -> Self {
        Self { issues, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            issues: Vec::new(),
            fail: true,
        }
    }
}

impl IssueStore for MockIssueStore {
    async fn issues_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Issue>> {
        if self.fail {
            return Err(DatabaseError::QueryError("disk I/O error".into()));
        }
        Ok(self
            .issues
            .iter()
            .filter(|issue| issue.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct State {
    users: HashMap<i64, (Option<String>, String)>,
    profiles: HashMap<i64, UserProfile>,
    default_inserts: usize,
    identity_writes: usize,
    profile_writes: usize,
    write_log: Vec<&'static str>,
    fail_identity: bool,
}

/// Profile store double that records every write it receives.
#[derive(Clone, Default)]
pub struct MockProfileStore {
    state: Arc<RwLock<State>>,
}

impl MockProfileStore {
    pub fn with_user(user_id: i64, name: &str, email: &str) -> Self {
        let mut state = State::default();
        state
            .users
            .insert(user_id, (Some(name.to_string()), email.to_string()));
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn fail_identity_writes(&self) {
        self.state.write().await.fail_identity = true;
    }

    pub async fn profile_rows(&self) -> usize {
        self.state.read().await.profiles.len()
    }

    pub async fn default_inserts(&self) -> usize {
        self.state.read().await.default_inserts
    }

    pub async fn identity_writes(&self) -> usize {
        self.state.read().await.identity_writes
    }

    pub async fn profile_writes(&self) -> usize {
        self.state.read().await.profile_writes
    }

    pub async fn write_log(&self) -> Vec<&'static str> {
        self.state.read().await.write_log.clone()
    }
}

fn default_profile(user_id: i64) -> UserProfile {
    let now = Utc::now().to_rfc3339();
    UserProfile {
        id: user_id,
        user_id,
        phone: None,
        address: None,
        city: None,
        state: None,
        pincode: None,
        bio: None,
        profile_image: None,
        email_notifications: true,
        push_notifications: true,
        issue_updates: true,
        nearby_issues: true,
        weekly_digest: false,
        critical_alerts: true,
        resolution_updates: true,
        comment_replies: true,
        upvote_notifications: false,
        profile_visibility: "public".into(),
        show_email: false,
        show_phone: false,
        show_location: true,
        allow_analytics: true,
        data_sharing: false,
        language: "en".into(),
        timezone: "UTC".into(),
        date_format: "DD/MM/YYYY".into(),
        map_provider: "openstreetmap".into(),
        auto_refresh: true,
        refresh_interval: 30,
        created_at: now.clone(),
        updated_at: now,
    }
}

fn apply(profile: &mut UserProfile, column: ProfileColumn, value: &ColumnValue) {
    let text = |value: &ColumnValue| match value {
        ColumnValue::Text(text) => text.clone(),
        _ => None,
    };
    let flag = |value: &ColumnValue| matches!(value, ColumnValue::Flag(true));

    match column {
        ProfileColumn::Phone => profile.phone = text(value),
        ProfileColumn::Address => profile.address = text(value),
        ProfileColumn::City => profile.city = text(value),
        ProfileColumn::State => profile.state = text(value),
        ProfileColumn::Pincode => profile.pincode = text(value),
        ProfileColumn::Bio => profile.bio = text(value),
        ProfileColumn::ProfileImage => profile.profile_image = text(value),
        ProfileColumn::EmailNotifications => profile.email_notifications = flag(value),
        ProfileColumn::PushNotifications => profile.push_notifications = flag(value),
        ProfileColumn::IssueUpdates => profile.issue_updates = flag(value),
        ProfileColumn::NearbyIssues => profile.nearby_issues = flag(value),
        ProfileColumn::WeeklyDigest => profile.weekly_digest = flag(value),
        ProfileColumn::CriticalAlerts => profile.critical_alerts = flag(value),
        ProfileColumn::ResolutionUpdates => profile.resolution_updates = flag(value),
        ProfileColumn::CommentReplies => profile.comment_replies = flag(value),
        ProfileColumn::UpvoteNotifications => profile.upvote_notifications = flag(value),
        ProfileColumn::ProfileVisibility => {
            profile.profile_visibility = text(value).unwrap_or_default()
        }
        ProfileColumn::ShowEmail => profile.show_email = flag(value),
        ProfileColumn::ShowPhone => profile.show_phone = flag(value),
        ProfileColumn::ShowLocation => profile.show_location = flag(value),
        ProfileColumn::AllowAnalytics => profile.allow_analytics = flag(value),
        ProfileColumn::DataSharing => profile.data_sharing = flag(value),
        ProfileColumn::Language => profile.language = text(value).unwrap_or_default(),
        ProfileColumn::Timezone => profile.timezone = text(value).unwrap_or_default(),
        ProfileColumn::DateFormat => profile.date_format = text(value).unwrap_or_default(),
        ProfileColumn::MapProvider => profile.map_provider = text(value).unwrap_or_default(),
        ProfileColumn::AutoRefresh => profile.auto_refresh = flag(value),
        ProfileColumn::RefreshInterval => {
            if let ColumnValue::Integer(interval) = value {
                profile.refresh_interval = *interval;
            }
        }
    }
}

impl ProfileStore for MockProfileStore {
    async fn find_profile(&self, user_id: i64) -> DatabaseResult<Option<ProfileWithIdentity>> {
        let state = self.state.read().await;
        let (Some(profile), Some((name, email))) =
            (state.profiles.get(&user_id), state.users.get(&user_id))
        else {
            return Ok(None);
        };
        Ok(Some(ProfileWithIdentity {
            profile: profile.clone(),
            full_name: name.clone(),
            email: email.clone(),
            avatar: None,
        }))
    }

    async fn insert_default_profile(&self, user_id: i64) -> DatabaseResult<bool> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(DatabaseError::QueryError("FOREIGN KEY constraint failed".into()));
        }
        if state.profiles.contains_key(&user_id) {
            return Ok(false);
        }
        state.profiles.insert(user_id, default_profile(user_id));
        state.default_inserts += 1;
        Ok(true)
    }

    async fn update_identity(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<IdentityColumn>],
    ) -> DatabaseResult<()> {
        let mut state = self.state.write().await;
        if state.fail_identity {
            return Err(DatabaseError::QueryError("database is locked".into()));
        }
        state.identity_writes += 1;
        state.write_log.push("identity");
        if let Some((name, _)) = state.users.get_mut(&user_id) {
            for write in writes {
                match (write.column, &write.value) {
                    (IdentityColumn::Name, ColumnValue::Text(text)) => *name = text.clone(),
                    (IdentityColumn::Name, _) => {}
                }
            }
        }
        Ok(())
    }

    async fn upsert_profile(
        &self,
        user_id: i64,
        writes: &[ColumnWrite<ProfileColumn>],
    ) -> DatabaseResult<()> {
        let mut state = self.state.write().await;
        state.profile_writes += 1;
        state.write_log.push("profile");
        let profile = state
            .profiles
            .entry(user_id)
            .or_insert_with(|| default_profile(user_id));
        for write in writes {
            apply(profile, write.column, &write.value);
        }
        profile.updated_at = Utc::now().to_rfc3339();
        Ok(())
    }

    async fn delete_user(&self, user_id: i64) -> DatabaseResult<()> {
        let mut state = self.state.write().await;
        state.write_log.push("delete");
        state.users.remove(&user_id);
        state.profiles.remove(&user_id);
        Ok(())
    }
}
