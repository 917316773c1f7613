//! Sidebar conversation summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Title of a conversation that has not received its first message yet.
pub const DEFAULT_TITLE: &str = "Nouvelle conversation";

/// Titles derived from a first message are cut to this many characters.
const TITLE_LIMIT: usize = 30;

/// Summary metadata for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
}

impl Conversation {
    /// Start a conversation whose last message is its opening text.
    pub fn new(
        title: impl Into<String>,
        last_message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            title: title.into(),
            last_message: last_message.into(),
            timestamp,
            unread: Some(false),
        }
    }
}

/// Derive a conversation title from its first message.
pub fn title_for(text: &str) -> String {
    if text.chars().count() > TITLE_LIMIT {
        let head: String = text.chars().take(TITLE_LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_owned()
    }
}
