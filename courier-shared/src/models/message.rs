use serde::{Deserialize, Serialize};

use super::{Timestamp, errors::ThreadError};

/// Kind of payload carried by a message body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    Media,
    Draftjs,
}

impl MessageType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Media => "media",
            Self::Draftjs => "draftjs",
        }
    }
}

/// The user who sent a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Stable user identifier; grouping keys on it.
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MessageContent {
    pub body: String,
}

/// A single direct message as delivered by the API or the live feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Opaque identifier. An empty value marks a malformed record.
    #[serde(default)]
    pub id: String,
    pub timestamp: Timestamp,
    pub author: Author,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub content: MessageContent,
}

impl Message {
    /// Reject records that would break identity-based reconciliation.
    pub fn validate(&self) -> Result<(), ThreadError> {
        if self.id.trim().is_empty() {
            return Err(ThreadError::MalformedMessage {
                index: None,
                reason: "missing identifier".to_string(),
            });
        }
        if self.author.id.trim().is_empty() {
            return Err(ThreadError::MalformedMessage {
                index: None,
                reason: format!("message {} has no author", self.id),
            });
        }
        Ok(())
    }
}
