//! Chat transcript messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Typed or quick-action input from the customer.
    User,
    /// Reply relayed from the assistant.
    Agent,
}

/// A message in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message id
    pub id: String,

    /// The author of the message
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// The message text
    pub content: String,

    /// When the message was appended
    pub timestamp: DateTime<Utc>,

    /// Display name of the answering agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            kind: MessageKind::User,
            content: content.into(),
            timestamp,
            agent_name: None,
        }
    }

    /// Create a new agent message tagged with a display name
    pub fn agent(
        agent_name: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            kind: MessageKind::Agent,
            content: content.into(),
            timestamp,
            agent_name: Some(agent_name.into()),
        }
    }
}
