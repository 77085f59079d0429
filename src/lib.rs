//! An async client library for the JIRA REST API v2.
//!
//! `jirakit` covers a small read-only slice of the API — server info,
//! issue lookup, and user lookup — and hands every response back twice:
//! once as a typed domain struct and once as the raw [`serde_json::Value`]
//! tree, so callers can reach custom fields the typed model does not know
//! about.
//!
//! # Example
//!
//! ```no_run
//! use jirakit::JiraClient;
//!
//! # async fn run() -> Result<(), jirakit::ApiError> {
//! let jira = JiraClient::new("https://jira.example.com", "my-token")?;
//!
//! let response = jira.get_issue("PROJ-123", &[], &[]).await?;
//! println!("{}", response.parsed.key);
//!
//! // Fields outside the typed model stay reachable through the raw tree.
//! let votes = response.parsed.fields.field("votes");
//! # let _ = votes;
//! # Ok(())
//! # }
//! ```
//!
//! # Decoding policy
//!
//! Decoders distinguish required from optional fields. A missing or
//! wrongly-typed required field fails the decode of that entity with a
//! [`DecodeError`]. Optional fields resolve to `None` instead, and an
//! optional nested entity that fails its own decode also resolves to
//! `None` rather than failing its parent. Arrays of nested entities drop
//! malformed elements and keep the rest in order. See [`models`] for the
//! per-entity field lists.

pub mod client;
pub mod error;
pub mod json;
pub mod models;

pub use client::JiraClient;
pub use error::{ApiError, DecodeError};
pub use json::JsonAccess;
pub use models::{
    AvatarUrls, Changelog, History, HistoryItem, Issue, IssueFields, IssueType, JiraResponse,
    Priority, Project, ServerInfo, Status, StatusCategory, User,
};
