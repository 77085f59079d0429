//! Typed domain entities decoded from JIRA API responses.
//!
//! Every entity is an immutable value object built once from a JSON tree
//! by its `from_json` constructor. Required fields fail the decode when
//! absent or mismatched; optional fields — including whole nested
//! entities — resolve to `None` instead.

mod issue;
mod server_info;
mod user;

pub use issue::{
    Changelog, History, HistoryItem, Issue, IssueFields, IssueType, Priority, Project, Status,
    StatusCategory,
};
pub use server_info::ServerInfo;
pub use user::{AvatarUrls, User};

use serde::Serialize;
use serde_json::Value;

/// A successful API response: the untouched raw JSON tree paired with the
/// entity decoded from it.
///
/// The raw tree is kept so callers can read fields the typed model does
/// not cover, e.g. through [`crate::JsonAccess`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JiraResponse<T> {
    /// The raw JSON body exactly as the server returned it.
    pub raw: Value,
    /// The entity decoded from `raw`.
    pub parsed: T,
}
