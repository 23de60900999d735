//! Database entities

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, FromRow)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Conversation {
            id: new_id(),
            user_id: user_id.into(),
            title: DEFAULT_CONVERSATION_TITLE.to_owned(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum MessageAgent {
    User,
    Chatbot,
}

#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub user_id: String,
    pub conversation_id: String,
    /// Ordering of the message within its conversation.
    pub position: i64,
    pub agent: MessageAgent,
    pub is_active: bool,
    pub generation_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        user_id: impl Into<String>,
        conversation_id: impl Into<String>,
        agent: MessageAgent,
        text: impl Into<String>,
        position: i64,
    ) -> Self {
        let now = Utc::now();
        Message {
            id: new_id(),
            text: text.into(),
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
            position,
            agent,
            is_active: true,
            generation_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub conversation_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl File {
    pub fn new(
        user_id: impl Into<String>,
        conversation_id: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        file_size: i64,
    ) -> Self {
        let now = Utc::now();
        File {
            id: new_id(),
            file_name: file_name.into(),
            file_path: file_path.into(),
            file_size,
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A span of a message's text backed by one or more documents.
#[derive(Debug, Clone, FromRow)]
pub struct Citation {
    pub id: String,
    pub text: String,
    #[sqlx(rename = "start_offset")]
    pub start: i64,
    #[sqlx(rename = "end_offset")]
    pub end: i64,
    pub user_id: String,
    pub message_id: String,
    #[sqlx(json)]
    pub document_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Citation {
    pub fn new(
        user_id: impl Into<String>,
        message_id: impl Into<String>,
        text: impl Into<String>,
        start: i64,
        end: i64,
        document_ids: Vec<String>,
    ) -> Self {
        Citation {
            id: new_id(),
            text: text.into(),
            start,
            end,
            user_id: user_id.into(),
            message_id: message_id.into(),
            document_ids,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: String,
    pub message_id: String,
    pub conversation_id: String,
    pub text: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub tool_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        message_id: impl Into<String>,
        conversation_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Document {
            id: new_id(),
            message_id: message_id.into(),
            conversation_id: conversation_id.into(),
            text: text.into(),
            title: None,
            url: None,
            tool_name: None,
            created_at: Utc::now(),
        }
    }
}

// Partial updates: `None` leaves the stored value untouched.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConversation {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFile {
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMessage {
    pub text: Option<String>,
    pub position: Option<i64>,
    pub is_active: Option<bool>,
    pub generation_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCitation {
    pub text: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub document_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub text: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Offset/limit window over a creation-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(offset: i64, limit: i64) -> Self {
        Pagination { offset, limit }
    }

    /// Negative values are clamped to zero; SQLite treats a negative LIMIT as unbounded.
    pub fn bounds(&self) -> (i64, i64) {
        (self.offset.max(0), self.limit.max(0))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Rows removed by a cascading delete, besides the parent itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub messages: u64,
    pub citations: u64,
    pub documents: u64,
    pub files: u64,
}
