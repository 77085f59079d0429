//! JIRA issue entities.
//!
//! Returned by `GET /rest/api/2/issue/{issueIdOrKey}`. An issue only
//! requires `id` and `key`; everything under `fields` is tolerated
//! per-field, so a response trimmed by a `fields=` query parameter — or
//! one carrying a malformed sub-object — still decodes.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::json::JsonAccess;

use super::user::User;

/// Decode an optional nested entity, swallowing its errors.
///
/// An absent sub-tree, a sub-tree that is not an object (`null`, a
/// string, a number), and an object that fails its own decode (e.g. a
/// `project` missing its required `id`) all resolve to `None`; nested
/// failures never propagate to the parent entity. The object guard
/// matters for entities without required fields, which would otherwise
/// decode an arbitrary scalar into an empty shell.
fn optional_nested<T>(
    json: &Value,
    key: &str,
    decode: fn(&Value) -> Result<T, DecodeError>,
) -> Option<T> {
    json.get(key)
        .filter(|sub| sub.is_object())
        .and_then(|sub| decode(sub).ok())
}

/// Decode each element of an array field independently, dropping the
/// malformed ones and preserving the order of the survivors. An absent
/// or non-array field yields an empty vector.
fn tolerant_array<T>(
    json: &Value,
    key: &str,
    decode: fn(&Value) -> Result<T, DecodeError>,
) -> Vec<T> {
    json.get_array(key)
        .map(|elements| elements.iter().filter_map(|e| decode(e).ok()).collect())
        .unwrap_or_default()
}

/// A JIRA issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// The numeric issue ID, as a string.
    pub id: String,
    /// The issue key, e.g. "PROJ-123".
    pub key: String,
    /// The issue fields. Always present, possibly empty.
    pub fields: IssueFields,
    /// The change history, present when requested via `expand=changelog`.
    pub changelog: Option<Changelog>,
}

impl Issue {
    /// Decode an issue from a JSON tree.
    ///
    /// `id` and `key` are required. A missing or non-object `fields`
    /// decodes to an empty [`IssueFields`]; a malformed `changelog`
    /// decodes to `None`.
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        let required = |field| DecodeError::new("Issue", field);

        let fields = match json.get("fields") {
            Some(sub) if sub.is_object() => IssueFields::from_json(sub),
            _ => IssueFields::empty(),
        };

        Ok(Self {
            id: json.get_str("id").ok_or_else(|| required("id"))?.to_string(),
            key: json
                .get_str("key")
                .ok_or_else(|| required("key"))?
                .to_string(),
            fields,
            changelog: optional_nested(json, "changelog", Changelog::from_json),
        })
    }

    /// The issue summary, if present.
    pub fn summary(&self) -> Option<&str> {
        self.fields.summary.as_deref()
    }

    /// The status name, if the status and its name are present.
    pub fn status_name(&self) -> Option<&str> {
        self.fields.status.as_ref()?.name.as_deref()
    }

    /// The issue type name, if present.
    pub fn issue_type_name(&self) -> Option<&str> {
        self.fields.issuetype.as_ref()?.name.as_deref()
    }

    /// The priority name, if present.
    pub fn priority_name(&self) -> Option<&str> {
        self.fields.priority.as_ref()?.name.as_deref()
    }

    /// The assignee display name, or "Unassigned".
    pub fn assignee_name(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map(|u| u.display_name.as_str())
            .unwrap_or("Unassigned")
    }

    /// The project key, if present.
    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref()?.key.as_deref()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.summary() {
            Some(summary) => write!(f, "{}: {}", self.key, summary),
            None => write!(f, "{}", self.key),
        }
    }
}

/// The `fields` object of an issue.
///
/// Every typed field here is optional; servers omit fields freely
/// depending on the `fields=` query parameter and project configuration.
/// The originating JSON subtree is retained, so fields without a typed
/// representation (custom fields included) stay reachable through
/// [`IssueFields::field`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueFields {
    /// The one-line summary.
    pub summary: Option<String>,
    /// The description. Plain text under API v2.
    pub description: Option<String>,
    /// The issue type (Bug, Story, Task, ...).
    pub issuetype: Option<IssueType>,
    /// The project the issue belongs to.
    pub project: Option<Project>,
    /// The workflow status.
    pub status: Option<Status>,
    /// The priority.
    pub priority: Option<Priority>,
    /// The user who created the issue.
    pub creator: Option<User>,
    /// The current assignee.
    pub assignee: Option<User>,
    /// The reporter.
    pub reporter: Option<User>,
    /// When the issue was created.
    pub created: Option<String>,
    /// When the issue was last updated.
    pub updated: Option<String>,
    /// The due date.
    pub duedate: Option<String>,
    /// The raw `fields` subtree, kept for lookups by name.
    #[serde(skip)]
    raw: Value,
}

impl IssueFields {
    /// Decode issue fields from a JSON tree. Never fails: absent and
    /// malformed fields resolve to `None`.
    pub fn from_json(json: &Value) -> Self {
        Self {
            summary: json.get_str("summary").map(str::to_string),
            description: json.get_str("description").map(str::to_string),
            issuetype: optional_nested(json, "issuetype", IssueType::from_json),
            project: optional_nested(json, "project", Project::from_json),
            status: optional_nested(json, "status", Status::from_json),
            priority: optional_nested(json, "priority", Priority::from_json),
            creator: optional_nested(json, "creator", User::from_json),
            assignee: optional_nested(json, "assignee", User::from_json),
            reporter: optional_nested(json, "reporter", User::from_json),
            created: json.get_str("created").map(str::to_string),
            updated: json.get_str("updated").map(str::to_string),
            duedate: json.get_str("duedate").map(str::to_string),
            raw: json.clone(),
        }
    }

    /// An empty fields object, used when an issue response carries no
    /// `fields` entry at all.
    pub fn empty() -> Self {
        Self::from_json(&Value::Object(serde_json::Map::new()))
    }

    /// Look up any field by name in the original `fields` subtree,
    /// including custom fields with no typed representation.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// The raw `fields` subtree this object was decoded from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// An issue type such as Bug, Story, or Task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    /// The issue type ID.
    pub id: String,
    /// The issue type name.
    pub name: Option<String>,
    /// The issue type description.
    pub description: Option<String>,
    /// URL of the issue type icon.
    pub icon_url: Option<String>,
}

impl IssueType {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: json
                .get_str("id")
                .ok_or_else(|| DecodeError::new("IssueType", "id"))?
                .to_string(),
            name: json.get_str("name").map(str::to_string),
            description: json.get_str("description").map(str::to_string),
            icon_url: json.get_str("iconUrl").map(str::to_string),
        })
    }
}

/// A JIRA project reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    /// The project ID.
    pub id: String,
    /// The project key, e.g. "PROJ".
    pub key: Option<String>,
    /// The project name.
    pub name: Option<String>,
}

impl Project {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: json
                .get_str("id")
                .ok_or_else(|| DecodeError::new("Project", "id"))?
                .to_string(),
            key: json.get_str("key").map(str::to_string),
            name: json.get_str("name").map(str::to_string),
        })
    }
}

/// A workflow status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// The status ID.
    pub id: String,
    /// The status name, e.g. "In Progress".
    pub name: Option<String>,
    /// The category this status falls into.
    pub status_category: Option<StatusCategory>,
}

impl Status {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: json
                .get_str("id")
                .ok_or_else(|| DecodeError::new("Status", "id"))?
                .to_string(),
            name: json.get_str("name").map(str::to_string),
            status_category: optional_nested(json, "statusCategory", StatusCategory::from_json),
        })
    }
}

/// A status category (to-do, in-progress, done).
///
/// Unlike the other entities, the ID here is numeric on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCategory {
    /// The category ID.
    pub id: i64,
    /// The category key, e.g. "done".
    pub key: Option<String>,
    /// The category name.
    pub name: Option<String>,
}

impl StatusCategory {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: json
                .get_i64("id")
                .ok_or_else(|| DecodeError::new("StatusCategory", "id"))?,
            key: json.get_str("key").map(str::to_string),
            name: json.get_str("name").map(str::to_string),
        })
    }
}

/// An issue priority.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    /// The priority ID.
    pub id: String,
    /// The priority name, e.g. "Medium".
    pub name: Option<String>,
    /// URL of the priority icon.
    pub icon_url: Option<String>,
}

impl Priority {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: json
                .get_str("id")
                .ok_or_else(|| DecodeError::new("Priority", "id"))?
                .to_string(),
            name: json.get_str("name").map(str::to_string),
            icon_url: json.get_str("iconUrl").map(str::to_string),
        })
    }
}

/// An issue's change history, returned when `expand=changelog` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Changelog {
    /// The index of the first history entry returned.
    pub start_at: Option<i64>,
    /// The maximum number of entries requested.
    pub max_results: Option<i64>,
    /// The total number of entries available.
    pub total: Option<i64>,
    /// The history entries, oldest first. Malformed entries are dropped.
    pub histories: Vec<History>,
}

impl Changelog {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            start_at: json.get_i64("startAt"),
            max_results: json.get_i64("maxResults"),
            total: json.get_i64("total"),
            histories: tolerant_array(json, "histories", History::from_json),
        })
    }
}

/// One changelog entry: a set of field changes made at a single moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    /// The history entry ID.
    pub id: String,
    /// The user who made the change.
    pub author: Option<User>,
    /// When the change was made.
    pub created: Option<String>,
    /// The individual field changes. Malformed items are dropped.
    pub items: Vec<HistoryItem>,
}

impl History {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            id: json
                .get_str("id")
                .ok_or_else(|| DecodeError::new("History", "id"))?
                .to_string(),
            author: optional_nested(json, "author", User::from_json),
            created: json.get_str("created").map(str::to_string),
            items: tolerant_array(json, "items", HistoryItem::from_json),
        })
    }
}

/// A single field change within a changelog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// The name of the field that changed.
    pub field: String,
    /// The field type, e.g. "jira" or "custom".
    pub fieldtype: Option<String>,
    /// The previous value's ID.
    pub from: Option<String>,
    /// The previous value, rendered as a string.
    pub from_string: Option<String>,
    /// The new value's ID.
    pub to: Option<String>,
    /// The new value, rendered as a string.
    pub to_string: Option<String>,
}

impl HistoryItem {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            field: json
                .get_str("field")
                .ok_or_else(|| DecodeError::new("HistoryItem", "field"))?
                .to_string(),
            fieldtype: json.get_str("fieldtype").map(str::to_string),
            from: json.get_str("from").map(str::to_string),
            from_string: json.get_str("fromString").map(str::to_string),
            to: json.get_str("to").map(str::to_string),
            to_string: json.get_str("toString").map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_issue() -> Value {
        json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {
                "summary": "Test Issue",
                "description": "This is a test issue",
                "issuetype": {
                    "id": "10001",
                    "name": "Bug",
                    "description": "A software defect",
                    "iconUrl": "https://example.com/bug.png"
                },
                "project": {
                    "id": "10100",
                    "key": "PROJ",
                    "name": "Test Project"
                },
                "status": {
                    "id": "10002",
                    "name": "In Progress",
                    "statusCategory": {
                        "id": 4,
                        "key": "inprogress",
                        "name": "In Progress"
                    }
                },
                "priority": {
                    "id": "3",
                    "name": "Medium",
                    "iconUrl": "https://example.com/medium.png"
                },
                "assignee": {
                    "accountId": "assignee123",
                    "displayName": "Assignee User",
                    "active": true,
                    "avatarUrls": {
                        "16x16": "https://avatar.example.com/16",
                        "32x32": "https://avatar.example.com/32",
                        "48x48": "https://avatar.example.com/48"
                    }
                },
                "created": "2023-01-01T10:00:00.000+0000",
                "updated": "2023-01-02T15:30:00.000+0000",
                "duedate": "2023-02-01"
            }
        })
    }

    #[test]
    fn test_minimal_issue_decodes_with_empty_fields() {
        let json = json!({"id": "10000", "key": "PROJ-123"});
        let issue = Issue::from_json(&json).unwrap();
        assert_eq!(issue.id, "10000");
        assert_eq!(issue.key, "PROJ-123");
        assert_eq!(issue.fields, IssueFields::empty());
        assert!(issue.changelog.is_none());
    }

    #[test]
    fn test_missing_id_fails() {
        let json = json!({"key": "PROJ-123"});
        let err = Issue::from_json(&json).unwrap_err();
        assert_eq!(err, DecodeError::new("Issue", "id"));
    }

    #[test]
    fn test_missing_key_fails() {
        let json = json!({"id": "10000"});
        let err = Issue::from_json(&json).unwrap_err();
        assert_eq!(err, DecodeError::new("Issue", "key"));
    }

    #[test]
    fn test_partial_fields() {
        let json = json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {"summary": "Test Issue"}
        });
        let issue = Issue::from_json(&json).unwrap();
        assert_eq!(issue.summary(), Some("Test Issue"));
        assert!(issue.fields.description.is_none());
        assert!(issue.fields.status.is_none());
        assert!(issue.fields.issuetype.is_none());
    }

    #[test]
    fn test_full_issue() {
        let issue = Issue::from_json(&full_issue()).unwrap();

        assert_eq!(issue.summary(), Some("Test Issue"));
        assert_eq!(
            issue.fields.description.as_deref(),
            Some("This is a test issue")
        );
        assert_eq!(issue.issue_type_name(), Some("Bug"));
        assert_eq!(issue.project_key(), Some("PROJ"));
        assert_eq!(issue.status_name(), Some("In Progress"));
        assert_eq!(issue.priority_name(), Some("Medium"));
        assert_eq!(issue.assignee_name(), "Assignee User");
        assert_eq!(
            issue.fields.created.as_deref(),
            Some("2023-01-01T10:00:00.000+0000")
        );
        assert_eq!(issue.fields.duedate.as_deref(), Some("2023-02-01"));

        let category = issue
            .fields
            .status
            .as_ref()
            .unwrap()
            .status_category
            .as_ref()
            .unwrap();
        assert_eq!(category.id, 4);
        assert_eq!(category.key.as_deref(), Some("inprogress"));
    }

    #[test]
    fn test_non_object_fields_decode_as_empty() {
        let json = json!({"id": "10000", "key": "PROJ-123", "fields": "oops"});
        let issue = Issue::from_json(&json).unwrap();
        assert_eq!(issue.fields, IssueFields::empty());
    }

    #[test]
    fn test_malformed_nested_status_resolves_to_none() {
        // A status object without its required id must not fail the issue.
        let json = json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {
                "summary": "Test Issue",
                "status": {"name": "In Progress"}
            }
        });
        let issue = Issue::from_json(&json).unwrap();
        assert_eq!(issue.summary(), Some("Test Issue"));
        assert!(issue.fields.status.is_none());
    }

    #[test]
    fn test_malformed_assignee_resolves_to_none() {
        let json = json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {
                "assignee": {"displayName": "No Account Id"}
            }
        });
        let issue = Issue::from_json(&json).unwrap();
        assert!(issue.fields.assignee.is_none());
        assert_eq!(issue.assignee_name(), "Unassigned");
    }

    #[test]
    fn test_malformed_status_category_keeps_status() {
        let json = json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {
                "status": {
                    "id": "10002",
                    "name": "Done",
                    "statusCategory": {"key": "done"}
                }
            }
        });
        let issue = Issue::from_json(&json).unwrap();
        let status = issue.fields.status.unwrap();
        assert_eq!(status.id, "10002");
        assert!(status.status_category.is_none());
    }

    #[test]
    fn test_status_category_id_must_be_numeric() {
        let err = StatusCategory::from_json(&json!({"id": "4", "key": "done"})).unwrap_err();
        assert_eq!(err, DecodeError::new("StatusCategory", "id"));
    }

    #[test]
    fn test_null_fields_resolve_to_none() {
        let json = json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {
                "summary": "Test Issue",
                "description": null,
                "assignee": null,
                "priority": null,
                "duedate": null
            }
        });
        let issue = Issue::from_json(&json).unwrap();
        assert!(issue.fields.description.is_none());
        assert!(issue.fields.assignee.is_none());
        assert!(issue.fields.priority.is_none());
        assert!(issue.fields.duedate.is_none());
    }

    #[test]
    fn test_custom_field_lookup() {
        let json = json!({
            "id": "10000",
            "key": "PROJ-123",
            "fields": {
                "summary": "Test Issue",
                "customfield_10016": 5.0,
                "labels": ["backend", "urgent"]
            }
        });
        let issue = Issue::from_json(&json).unwrap();
        assert_eq!(
            issue.fields.field("customfield_10016").and_then(Value::as_f64),
            Some(5.0)
        );
        let labels = issue.fields.field("labels").unwrap();
        assert_eq!(labels.as_array().map(Vec::len), Some(2));
        assert_eq!(labels[0], json!("backend"));
        assert!(issue.fields.field("nonexistent").is_none());
        // The typed view and the raw view agree.
        assert_eq!(issue.fields.raw().get_str("summary"), Some("Test Issue"));
    }

    #[test]
    fn test_changelog_decodes() {
        let json = json!({
            "id": "10000",
            "key": "PROJ-123",
            "changelog": {
                "startAt": 0,
                "maxResults": 2,
                "total": 2,
                "histories": [
                    {
                        "id": "100",
                        "created": "2023-01-01T10:00:00.000+0000",
                        "items": [
                            {
                                "field": "status",
                                "fieldtype": "jira",
                                "from": "1",
                                "fromString": "Open",
                                "to": "3",
                                "toString": "In Progress"
                            }
                        ]
                    },
                    {
                        "id": "101",
                        "items": []
                    }
                ]
            }
        });
        let issue = Issue::from_json(&json).unwrap();
        let changelog = issue.changelog.unwrap();
        assert_eq!(changelog.start_at, Some(0));
        assert_eq!(changelog.total, Some(2));
        assert_eq!(changelog.histories.len(), 2);

        let item = &changelog.histories[0].items[0];
        assert_eq!(item.field, "status");
        assert_eq!(item.from_string.as_deref(), Some("Open"));
        assert_eq!(item.to_string.as_deref(), Some("In Progress"));
        assert!(changelog.histories[1].items.is_empty());
    }

    #[test]
    fn test_malformed_histories_are_dropped_in_order() {
        let json = json!({
            "histories": [
                {"id": "100", "items": []},
                {"created": "no id here"},
                {"id": "102", "items": []},
                "not even an object",
                {"id": "104"}
            ]
        });
        let changelog = Changelog::from_json(&json).unwrap();
        let ids: Vec<&str> = changelog.histories.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["100", "102", "104"]);
    }

    #[test]
    fn test_malformed_history_items_are_dropped_in_order() {
        let json = json!({
            "id": "100",
            "items": [
                {"field": "status", "toString": "Done"},
                {"fieldtype": "jira"},
                {"field": "assignee"}
            ]
        });
        let history = History::from_json(&json).unwrap();
        let fields: Vec<&str> = history.items.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, ["status", "assignee"]);
    }

    #[test]
    fn test_history_author_is_tolerant() {
        let json = json!({
            "id": "100",
            "author": {"displayName": "half a user"}
        });
        let history = History::from_json(&json).unwrap();
        assert!(history.author.is_none());
    }

    #[test]
    fn test_non_object_changelog_resolves_to_none() {
        // Changelog has no required fields, so only the object guard
        // keeps a type-mismatched value from decoding to an empty shell.
        for bad in [json!(null), json!("oops"), json!(5)] {
            let json = json!({"id": "10000", "key": "PROJ-123", "changelog": bad});
            let issue = Issue::from_json(&json).unwrap();
            assert!(issue.changelog.is_none());
        }
    }

    #[test]
    fn test_changelog_without_histories_field() {
        let changelog = Changelog::from_json(&json!({"total": 0})).unwrap();
        assert!(changelog.histories.is_empty());
        assert_eq!(changelog.start_at, None);
        assert_eq!(changelog.max_results, None);
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::from_json(&full_issue()).unwrap();
        assert_eq!(format!("{}", issue), "PROJ-123: Test Issue");

        let bare = Issue::from_json(&json!({"id": "1", "key": "PROJ-1"})).unwrap();
        assert_eq!(format!("{}", bare), "PROJ-1");
    }
}
