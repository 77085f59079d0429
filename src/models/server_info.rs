//! Server information returned by `GET /rest/api/2/serverInfo`.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json::JsonAccess;

/// Details about the JIRA instance itself.
///
/// Every field is required; a response missing any of them fails to
/// decode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// The base URL of the instance.
    pub base_url: String,
    /// The version string, e.g. "9.4.0".
    pub version: String,
    /// The build number.
    pub build_number: i64,
    /// When this build was made.
    pub build_date: String,
    /// The server's current time.
    pub server_time: String,
    /// Source-control revision information for the build.
    pub scm_info: String,
    /// The configured title of the instance.
    pub server_title: String,
}

impl ServerInfo {
    /// Decode server info from a JSON tree.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] naming the first required field that is
    /// missing or of the wrong type.
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        let required = |field| DecodeError::new("ServerInfo", field);

        Ok(Self {
            base_url: json
                .get_str("baseUrl")
                .ok_or_else(|| required("baseUrl"))?
                .to_string(),
            version: json
                .get_str("version")
                .ok_or_else(|| required("version"))?
                .to_string(),
            build_number: json
                .get_i64("buildNumber")
                .ok_or_else(|| required("buildNumber"))?,
            build_date: json
                .get_str("buildDate")
                .ok_or_else(|| required("buildDate"))?
                .to_string(),
            server_time: json
                .get_str("serverTime")
                .ok_or_else(|| required("serverTime"))?
                .to_string(),
            scm_info: json
                .get_str("scmInfo")
                .ok_or_else(|| required("scmInfo"))?
                .to_string(),
            server_title: json
                .get_str("serverTitle")
                .ok_or_else(|| required("serverTitle"))?
                .to_string(),
        })
    }
}
