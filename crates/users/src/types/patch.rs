//! Partial profile update payload.

use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

/// Every field is optional; an absent field leaves the stored value alone.
///
/// Nullable contact fields distinguish "absent" (`None`) from an explicit
/// `null` (`Some(None)`), which clears the stored value. For the remaining
/// fields an explicit `null` is the same as leaving the field out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ProfilePatch {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub full_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub pincode: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub profile_image: Option<Option<String>>,

    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub issue_updates: Option<bool>,
    pub nearby_issues: Option<bool>,
    pub weekly_digest: Option<bool>,
    pub critical_alerts: Option<bool>,
    pub resolution_updates: Option<bool>,
    pub comment_replies: Option<bool>,
    pub upvote_notifications: Option<bool>,

    pub profile_visibility: Option<String>,
    pub show_email: Option<bool>,
    pub show_phone: Option<bool>,
    pub show_location: Option<bool>,
    pub allow_analytics: Option<bool>,
    pub data_sharing: Option<bool>,

    pub language: Option<String>,
    pub timezone: Option<String>,
    pub date_format: Option<String>,
    pub map_provider: Option<String>,
    pub auto_refresh: Option<bool>,
    pub refresh_interval: Option<i64>,
}

/// Present-but-null becomes `Some(None)`; `#[serde(default)]` covers absence.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let patch: ProfilePatch =
            serde_json::from_str(r#"{ "phone": null, "city": "Indore", "weekly_digest": null }"#)
                .unwrap();

        assert_eq!(patch.phone, Some(None));
        assert_eq!(patch.city, Some(Some("Indore".to_string())));
        assert_eq!(patch.address, None);
        assert_eq!(patch.weekly_digest, None);
    }

    #[test]
    fn empty_object_is_an_empty_patch() {
        let patch: ProfilePatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch, ProfilePatch::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(serde_json::from_str::<ProfilePatch>(r#"{ "show_email": "yes" }"#).is_err());
    }
}
