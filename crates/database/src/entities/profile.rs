//! Per-user profile and preference record

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Contact details plus notification, privacy and display preferences.
///
/// At most one row exists per user; the column defaults in the schema
/// describe a freshly materialised profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,

    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,

    pub email_notifications: bool,
    pub push_notifications: bool,
    pub issue_updates: bool,
    pub nearby_issues: bool,
    pub weekly_digest: bool,
    pub critical_alerts: bool,
    pub resolution_updates: bool,
    pub comment_replies: bool,
    pub upvote_notifications: bool,

    pub profile_visibility: String,
    pub show_email: bool,
    pub show_phone: bool,
    pub show_location: bool,
    pub allow_analytics: bool,
    pub data_sharing: bool,

    pub language: String,
    pub timezone: String,
    pub date_format: String,
    pub map_provider: String,
    pub auto_refresh: bool,
    pub refresh_interval: i64,

    pub created_at: String,
    pub updated_at: String,
}

/// A profile with the owning user's identity fields flattened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileWithIdentity {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub full_name: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
}

/// Writable columns of `user_profiles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileColumn {
    Phone,
    Address,
    City,
    State,
    Pincode,
    Bio,
    ProfileImage,
    EmailNotifications,
    PushNotifications,
    IssueUpdates,
    NearbyIssues,
    WeeklyDigest,
    CriticalAlerts,
    ResolutionUpdates,
    CommentReplies,
    UpvoteNotifications,
    ProfileVisibility,
    ShowEmail,
    ShowPhone,
    ShowLocation,
    AllowAnalytics,
    DataSharing,
    Language,
    Timezone,
    DateFormat,
    MapProvider,
    AutoRefresh,
    RefreshInterval,
}

impl ProfileColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileColumn::Phone => "phone",
            ProfileColumn::Address => "address",
            ProfileColumn::City => "city",
            ProfileColumn::State => "state",
            ProfileColumn::Pincode => "pincode",
            ProfileColumn::Bio => "bio",
            ProfileColumn::ProfileImage => "profile_image",
            ProfileColumn::EmailNotifications => "email_notifications",
            ProfileColumn::PushNotifications => "push_notifications",
            ProfileColumn::IssueUpdates => "issue_updates",
            ProfileColumn::NearbyIssues => "nearby_issues",
            ProfileColumn::WeeklyDigest => "weekly_digest",
            ProfileColumn::CriticalAlerts => "critical_alerts",
            ProfileColumn::ResolutionUpdates => "resolution_updates",
            ProfileColumn::CommentReplies => "comment_replies",
            ProfileColumn::UpvoteNotifications => "upvote_notifications",
            ProfileColumn::ProfileVisibility => "profile_visibility",
            ProfileColumn::ShowEmail => "show_email",
            ProfileColumn::ShowPhone => "show_phone",
            ProfileColumn::ShowLocation => "show_location",
            ProfileColumn::AllowAnalytics => "allow_analytics",
            ProfileColumn::DataSharing => "data_sharing",
            ProfileColumn::Language => "language",
            ProfileColumn::Timezone => "timezone",
            ProfileColumn::DateFormat => "date_format",
            ProfileColumn::MapProvider => "map_provider",
            ProfileColumn::AutoRefresh => "auto_refresh",
            ProfileColumn::RefreshInterval => "refresh_interval",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            id: 1,
            user_id: 7,
            phone: None,
            address: None,
            city: Some("Pune".into()),
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
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn identity_fields_flatten_into_profile_object() {
        let joined = ProfileWithIdentity {
            profile: sample_profile(),
            full_name: Some("Asha".into()),
            email: "asha@example.com".into(),
            avatar: None,
        };

        let value = serde_json::to_value(&joined).unwrap();
        assert_eq!(value["full_name"], "Asha");
        assert_eq!(value["email"], "asha@example.com");
        assert_eq!(value["city"], "Pune");
        assert_eq!(value["user_id"], 7);
        assert!(value.get("profile").is_none());
    }
}
