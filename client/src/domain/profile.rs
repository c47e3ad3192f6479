//! User records returned by the backend.
//!
//! The profile blob is loosely typed on the wire: any field may be absent.
//! [`UserProfile`] models it as an explicit partial structure so missing
//! values are `None` instead of trusted defaults.

use serde::{Deserialize, Serialize};

/// Partial user profile, as returned by login and `/user-profiles`.
///
/// The same shape is sent back on update; unset fields are omitted from the
/// request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Identity (business) identifier linked to the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    /// Given name. The backend spells this key in lowercase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    /// Family name. The backend spells this key in lowercase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    /// Country name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// Banner image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    /// Free-text biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Account category; doubles as the session role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Contact e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Personal website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    /// Listed skills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Spoken languages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    /// Certifications held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
}

impl UserProfile {
    /// Listed skills, or an empty slice.
    pub fn skills(&self) -> &[String] {
        self.skills.as_deref().unwrap_or_default()
    }

    /// Spoken languages, or an empty slice.
    pub fn languages(&self) -> &[String] {
        self.languages.as_deref().unwrap_or_default()
    }

    /// Certifications, or an empty slice.
    pub fn certifications(&self) -> &[String] {
        self.certifications.as_deref().unwrap_or_default()
    }

    /// Whether no field is set. Sending such an update is a no-op.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Account record attached to businesses, posts and messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Account identifier.
    pub id: String,
    /// Login e-mail.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Role within a business.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Business the account belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<String>,
    /// Creation timestamp, as sent by the backend.
    pub created_at: String,
    /// Last update timestamp, as sent by the backend.
    pub updated_at: String,
}

impl User {
    /// `"<first> <last>"`, trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_profile_decodes_with_missing_fields_as_none() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "u-1",
            "firstname": "Ada",
            "skills": ["rust"],
            "unexpected": {"nested": true}
        }))
        .expect("sparse profile decodes");

        assert_eq!(profile.id.as_deref(), Some("u-1"));
        assert_eq!(profile.firstname.as_deref(), Some("Ada"));
        assert!(profile.lastname.is_none());
        assert_eq!(profile.skills(), ["rust".to_owned()]);
        assert!(profile.languages().is_empty());
    }

    #[test]
    fn partial_update_serialises_only_set_fields() {
        let update = UserProfile {
            bio: Some("Founder".to_owned()),
            country_code: Some("NG".to_owned()),
            ..UserProfile::default()
        };
        let body = serde_json::to_value(&update).expect("serialises");
        assert_eq!(body, json!({"bio": "Founder", "countryCode": "NG"}));
        assert!(!update.is_empty());
        assert!(UserProfile::default().is_empty());
    }

    #[test]
    fn user_display_name_is_trimmed() {
        let user = User {
            first_name: "Ada".to_owned(),
            ..User::default()
        };
        assert_eq!(user.display_name(), "Ada");
    }
}
