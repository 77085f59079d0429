//! The JIRA API client.
//!
//! [`JiraClient`] builds authenticated GET requests against a configured
//! base URL, classifies HTTP responses, and pairs each raw JSON body with
//! its decoded entity. It holds only immutable configuration, so a single
//! instance can serve concurrent callers.

use reqwest::{header, Client, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{ApiError, Result};
use crate::models::{Issue, JiraResponse, ServerInfo, User};

/// An async client for the JIRA REST API v2.
///
/// Authentication is bearer-token only. Every operation performs exactly
/// one round trip and suspends the caller until the server responds or
/// the transport fails; there is no internal timeout, retry, or caching.
#[derive(Debug)]
pub struct JiraClient {
    /// The HTTP client.
    http: Client,
    /// The base URL of the JIRA instance, normalized with a trailing
    /// slash so relative paths append cleanly.
    base_url: Url,
    /// The bearer token sent with every request.
    token: String,
}

impl JiraClient {
    /// Create a client for the JIRA instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot be parsed.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url)?,
            token: token.to_string(),
        })
    }

    /// The normalized base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Get information about the JIRA instance.
    ///
    /// Calls `GET rest/api/2/serverInfo`.
    #[instrument(skip(self))]
    pub async fn get_server_info(&self) -> Result<JiraResponse<ServerInfo>> {
        let raw = self.execute("rest/api/2/serverInfo", &[]).await?;
        let parsed = ServerInfo::from_json(&raw)?;
        Ok(JiraResponse { raw, parsed })
    }

    /// Get an issue by ID or key.
    ///
    /// Calls `GET rest/api/2/issue/{issueIdOrKey}`. `fields` restricts
    /// which fields the server returns and `expand` requests expansions
    /// such as `changelog`; both are comma-joined and omitted from the
    /// query string when empty.
    #[instrument(skip(self), fields(issue = %issue_id_or_key))]
    pub async fn get_issue(
        &self,
        issue_id_or_key: &str,
        fields: &[&str],
        expand: &[&str],
    ) -> Result<JiraResponse<Issue>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if !fields.is_empty() {
            query.push(("fields", fields.join(",")));
        }
        if !expand.is_empty() {
            query.push(("expand", expand.join(",")));
        }

        let path = format!("rest/api/2/issue/{issue_id_or_key}");
        let raw = self.execute(&path, &query).await?;
        let parsed = Issue::from_json(&raw)?;
        Ok(JiraResponse { raw, parsed })
    }

    /// Get an issue with its change history expanded.
    pub async fn get_issue_with_changelog(
        &self,
        issue_id_or_key: &str,
    ) -> Result<JiraResponse<Issue>> {
        self.get_issue(issue_id_or_key, &[], &["changelog"]).await
    }

    /// Get specific fields of an issue.
    ///
    /// `id` and `key` are appended to the requested field list when the
    /// caller omits them, so the result is always identifiable.
    pub async fn get_issue_fields(
        &self,
        issue_id_or_key: &str,
        field_keys: &[&str],
    ) -> Result<JiraResponse<Issue>> {
        let mut all_fields = field_keys.to_vec();
        if !all_fields.contains(&"id") {
            all_fields.push("id");
        }
        if !all_fields.contains(&"key") {
            all_fields.push("key");
        }

        self.get_issue(issue_id_or_key, &all_fields, &[]).await
    }

    /// Get a user by account ID.
    ///
    /// Calls `GET rest/api/2/user?accountId=...`.
    #[instrument(skip(self))]
    pub async fn get_user(&self, account_id: &str) -> Result<JiraResponse<User>> {
        self.fetch_user("rest/api/2/user", &[("accountId", account_id.to_string())])
            .await
    }

    /// Get a user by username.
    #[instrument(skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<JiraResponse<User>> {
        self.fetch_user("rest/api/2/user", &[("username", username.to_string())])
            .await
    }

    /// Get a user by email address.
    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<JiraResponse<User>> {
        self.fetch_user("rest/api/2/user", &[("emailAddress", email.to_string())])
            .await
    }

    /// Get the authenticated user.
    ///
    /// Calls `GET rest/api/2/myself`.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<JiraResponse<User>> {
        self.fetch_user("rest/api/2/myself", &[]).await
    }

    async fn fetch_user(&self, path: &str, query: &[(&str, String)]) -> Result<JiraResponse<User>> {
        let raw = self.execute(path, query).await?;
        let parsed = User::from_json(&raw)?;
        Ok(JiraResponse { raw, parsed })
    }

    /// Build, send, and classify a single GET request.
    ///
    /// 2xx responses parse their body as a JSON tree; any other status
    /// yields [`ApiError::Server`] with the body discarded. Transport
    /// errors propagate as-is.
    #[instrument(skip(self, query), fields(path = %path))]
    async fn execute(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(name, value)| (*name, value.as_str())));
        }

        debug!(url = %url, "sending GET request");

        let response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "request rejected by server");
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, "could not read response body");
            ApiError::InvalidResponse
        })?;

        let json = serde_json::from_slice(&body)?;
        debug!("received JSON response");
        Ok(json)
    }
}

/// Parse the base URL and ensure the path carries a trailing slash, so
/// `Url::join` appends segments instead of replacing the last one.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!(
            "{raw}: cannot be used as a base URL"
        )));
    }

    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }

    Ok(url)
}
