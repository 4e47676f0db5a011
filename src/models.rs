//! Frontend Models
//!
//! Data structures matching the backend JSON surface. Field names are
//! camelCase on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Column data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: u64,
    pub name: String,
    pub order_index: u32,
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub column_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub order_index: u32,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: u64,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: u64,
    pub task_id: u64,
    pub file_name: String,
    pub url: String,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Who (or what) a mention resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    User,
    /// Reserved tokens (`@card`, `@board`) that never resolve to a user
    Special,
}

/// Mention metadata carried alongside comment text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub kind: MentionKind,
}

impl Mention {
    pub fn user(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            kind: MentionKind::User,
        }
    }
}

/// Comment data structure; replies carry the parent comment id and are
/// exactly one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub task_id: u64,
    pub parent_id: Option<u64>,
    pub author_id: u64,
    #[serde(default)]
    pub author_name: String,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Append-only record of a discrete action taken on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub action: String,
    pub actor_name: String,
    #[serde(default)]
    pub data_json: Option<serde_json::Value>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Comments and activity for one task, fetched together in one request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskThread {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub activity: Vec<ActivityLogEntry>,
}
