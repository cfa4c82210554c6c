use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Message;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageEdge {
    pub cursor: String,
    pub node: Message,
}

/// A paginated, ordered batch of messages for one thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MessageConnection {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<MessageEdge>,
}

impl MessageConnection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.page_info.has_next_page
    }

    /// Whether any edge carries a well-formed message.
    #[must_use]
    pub fn has_nodes(&self) -> bool {
        self.edges.iter().any(|edge| edge.node.validate().is_ok())
    }

    /// Cursor to pass as `after` when fetching the next page.
    #[must_use]
    pub fn last_cursor(&self) -> Option<&str> {
        self.edges.last().map(|edge| edge.cursor.as_str())
    }

    /// Flatten the edges into messages, skipping malformed records.
    #[must_use]
    pub fn nodes(&self) -> Vec<Message> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(index, edge)| match edge.node.validate() {
                Ok(()) => Some(edge.node.clone()),
                Err(err) => {
                    warn!(error = %err.at_index(index), "dropping malformed message record");
                    None
                }
            })
            .collect()
    }

    /// Merge a follow-up page fetched with [`Self::last_cursor`].
    pub fn append_page(&mut self, next: Self) {
        self.edges.extend(next.edges);
        self.page_info.has_next_page = next.page_info.has_next_page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, MessageContent, MessageType, Timestamp};
    use chrono::{TimeZone, Utc};

    fn edge(cursor: &str, id: &str) -> MessageEdge {
        MessageEdge {
            cursor: cursor.to_string(),
            node: Message {
                id: id.to_string(),
                timestamp: Timestamp(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()),
                author: Author {
                    id: "u-1".to_string(),
                    name: "Ada".to_string(),
                    username: None,
                    avatar_url: None,
                },
                message_type: MessageType::Text,
                content: MessageContent::default(),
            },
        }
    }

    #[test]
    fn test_nodes_skip_malformed_records() {
        let connection = MessageConnection {
            page_info: PageInfo::default(),
            edges: vec![edge("c1", "m-1"), edge("c2", ""), edge("c3", "m-3")],
        };

        let ids: Vec<_> = connection.nodes().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["m-1", "m-3"]);
    }

    #[test]
    fn test_has_nodes_ignores_malformed_records() {
        let malformed = MessageConnection {
            page_info: PageInfo::default(),
            edges: vec![edge("c1", ""), edge("c2", " ")],
        };
        assert!(!malformed.is_empty());
        assert!(!malformed.has_nodes());

        let mixed = MessageConnection {
            page_info: PageInfo::default(),
            edges: vec![edge("c1", ""), edge("c2", "m-2")],
        };
        assert!(mixed.has_nodes());
    }

    #[test]
    fn test_append_page_moves_cursor() {
        let mut first = MessageConnection {
            page_info: PageInfo {
                has_next_page: true,
                has_previous_page: false,
            },
            edges: vec![edge("c1", "m-1")],
        };
        let second = MessageConnection {
            page_info: PageInfo {
                has_next_page: false,
                has_previous_page: true,
            },
            edges: vec![edge("c2", "m-2")],
        };

        assert_eq!(first.last_cursor(), Some("c1"));
        first.append_page(second);

        assert_eq!(first.edges.len(), 2);
        assert_eq!(first.last_cursor(), Some("c2"));
        assert!(!first.has_next_page());
    }

    #[test]
    fn test_deserializes_without_page_info() {
        let connection: MessageConnection = serde_json::from_str(r#"{"edges": []}"#).unwrap();
        assert!(connection.is_empty());
        assert!(connection.last_cursor().is_none());
    }
}
