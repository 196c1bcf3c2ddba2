//! Declarative routing of profile patch fields to storage columns.

use ourstreet_database::{ColumnValue, ColumnWrite, IdentityColumn, ProfileColumn};

use crate::types::ProfilePatch;

/// Which entity, and which column of it, a patch field lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Identity(IdentityColumn),
    Profile(ProfileColumn),
}

pub struct FieldMapping {
    pub field: &'static str,
    pub target: Target,
    extract: fn(&ProfilePatch) -> Option<ColumnValue>,
}

impl FieldMapping {
    pub fn value(&self, patch: &ProfilePatch) -> Option<ColumnValue> {
        (self.extract)(patch)
    }
}

macro_rules! mapping {
    ($field:ident => $target:expr, $convert:expr) => {
        FieldMapping {
            field: stringify!($field),
            target: $target,
            extract: |patch: &ProfilePatch| patch.$field.clone().map($convert),
        }
    };
}

use ProfileColumn as P;

pub static FIELD_MAPPINGS: &[FieldMapping] = &[
    mapping!(full_name => Target::Identity(IdentityColumn::Name), ColumnValue::Text),
    // contact
    mapping!(phone => Target::Profile(P::Phone), ColumnValue::Text),
    mapping!(address => Target::Profile(P::Address), ColumnValue::Text),
    mapping!(city => Target::Profile(P::City), ColumnValue::Text),
    mapping!(state => Target::Profile(P::State), ColumnValue::Text),
    mapping!(pincode => Target::Profile(P::Pincode), ColumnValue::Text),
    mapping!(bio => Target::Profile(P::Bio), ColumnValue::Text),
    mapping!(profile_image => Target::Profile(P::ProfileImage), ColumnValue::Text),
    // notifications
    mapping!(email_notifications => Target::Profile(P::EmailNotifications), ColumnValue::Flag),
    mapping!(push_notifications => Target::Profile(P::PushNotifications), ColumnValue::Flag),
    mapping!(issue_updates => Target::Profile(P::IssueUpdates), ColumnValue::Flag),
    mapping!(nearby_issues => Target::Profile(P::NearbyIssues), ColumnValue::Flag),
    mapping!(weekly_digest => Target::Profile(P::WeeklyDigest), ColumnValue::Flag),
    mapping!(critical_alerts => Target::Profile(P::CriticalAlerts), ColumnValue::Flag),
    mapping!(resolution_updates => Target::Profile(P::ResolutionUpdates), ColumnValue::Flag),
    mapping!(comment_replies => Target::Profile(P::CommentReplies), ColumnValue::Flag),
    mapping!(upvote_notifications => Target::Profile(P::UpvoteNotifications), ColumnValue::Flag),
    // privacy
    mapping!(profile_visibility => Target::Profile(P::ProfileVisibility), ColumnValue::text),
    mapping!(show_email => Target::Profile(P::ShowEmail), ColumnValue::Flag),
    mapping!(show_phone => Target::Profile(P::ShowPhone), ColumnValue::Flag),
    mapping!(show_location => Target::Profile(P::ShowLocation), ColumnValue::Flag),
    mapping!(allow_analytics => Target::Profile(P::AllowAnalytics), ColumnValue::Flag),
    mapping!(data_sharing => Target::Profile(P::DataSharing), ColumnValue::Flag),
    // system
    mapping!(language => Target::Profile(P::Language), ColumnValue::text),
    mapping!(timezone => Target::Profile(P::Timezone), ColumnValue::text),
    mapping!(date_format => Target::Profile(P::DateFormat), ColumnValue::text),
    mapping!(map_provider => Target::Profile(P::MapProvider), ColumnValue::text),
    mapping!(auto_refresh => Target::Profile(P::AutoRefresh), ColumnValue::Flag),
    mapping!(refresh_interval => Target::Profile(P::RefreshInterval), ColumnValue::Integer),
];

/// Column writes derived from a patch, split by target entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WritePlan {
    pub identity: Vec<ColumnWrite<IdentityColumn>>,
    pub profile: Vec<ColumnWrite<ProfileColumn>>,
}

impl WritePlan {
    pub fn from_patch(patch: &ProfilePatch) -> Self {
        let mut plan = WritePlan::default();
        for mapping in FIELD_MAPPINGS {
            let Some(value) = mapping.value(patch) else {
                continue;
            };
            match mapping.target {
                Target::Identity(column) => plan.identity.push(ColumnWrite::new(column, value)),
                Target::Profile(column) => plan.profile.push(ColumnWrite::new(column, value)),
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.identity.is_empty() && self.profile.is_empty()
    }
}
