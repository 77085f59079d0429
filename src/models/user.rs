//! JIRA user entities.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json::JsonAccess;

/// A JIRA user.
///
/// Returned by `GET /rest/api/2/user` and `GET /rest/api/2/myself`, and
/// embedded in issues as creator, assignee, reporter, and changelog
/// author.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's account ID.
    pub account_id: String,
    /// The user's display name.
    pub display_name: String,
    /// The user's email address, if visible.
    pub email_address: Option<String>,
    /// Whether the account is active.
    pub active: bool,
    /// The user's timezone, if visible.
    pub time_zone: Option<String>,
    /// URLs for the user's avatar images.
    pub avatar_urls: AvatarUrls,
}

/// Avatar image URLs keyed by icon size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarUrls {
    /// The 16x16 pixel avatar.
    #[serde(rename = "16x16")]
    pub small: String,
    /// The 32x32 pixel avatar.
    #[serde(rename = "32x32")]
    pub medium: String,
    /// The 48x48 pixel avatar.
    #[serde(rename = "48x48")]
    pub large: String,
}

impl AvatarUrls {
    /// Decode avatar URLs from a JSON tree. All three sizes are required.
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        let required = |field| DecodeError::new("AvatarUrls", field);

        Ok(Self {
            small: json
                .get_str("16x16")
                .ok_or_else(|| required("16x16"))?
                .to_string(),
            medium: json
                .get_str("32x32")
                .ok_or_else(|| required("32x32"))?
                .to_string(),
            large: json
                .get_str("48x48")
                .ok_or_else(|| required("48x48"))?
                .to_string(),
        })
    }
}

impl User {
    /// Decode a user from a JSON tree.
    ///
    /// `accountId`, `displayName`, `active`, and `avatarUrls` (with all
    /// three sizes) are required; `emailAddress` and `timeZone` may be
    /// hidden by privacy settings and decode to `None` when absent.
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        let required = |field| DecodeError::new("User", field);

        let avatar_urls = json
            .get("avatarUrls")
            .ok_or_else(|| required("avatarUrls"))
            .and_then(AvatarUrls::from_json)?;

        Ok(Self {
            account_id: json
                .get_str("accountId")
                .ok_or_else(|| required("accountId"))?
                .to_string(),
            display_name: json
                .get_str("displayName")
                .ok_or_else(|| required("displayName"))?
                .to_string(),
            email_address: json.get_str("emailAddress").map(str::to_string),
            active: json.get_bool("active").ok_or_else(|| required("active"))?,
            time_zone: json.get_str("timeZone").map(str::to_string),
            avatar_urls,
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
