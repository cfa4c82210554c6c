use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Timestamp;

/// A member of a direct-message thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<Timestamp>,
}

/// The signed-in viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Metadata for a direct-message thread, handed to the thread view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectMessageThread {
    pub id: Uuid,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<Timestamp>,
}

impl DirectMessageThread {
    /// Participants other than `current_user`.
    pub fn others<'a>(
        &'a self,
        current_user: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Participant> + 'a {
        self.participants
            .iter()
            .filter(move |participant| Some(participant.user_id.as_str()) != current_user)
    }

    /// Header title: the names of everyone except the viewer.
    #[must_use]
    pub fn title(&self, current_user: Option<&str>) -> String {
        let names: Vec<&str> = self
            .others(current_user)
            .map(|participant| participant.name.as_str())
            .collect();
        if names.is_empty() {
            "Direct message".to_string()
        } else {
            names.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str, name: &str) -> Participant {
        Participant {
            user_id: id.to_string(),
            name: name.to_string(),
            username: None,
            avatar_url: None,
            last_seen: None,
        }
    }

    #[test]
    fn test_title_excludes_viewer() {
        let thread = DirectMessageThread {
            id: Uuid::new_v4(),
            participants: vec![
                participant("u-1", "Ada"),
                participant("u-2", "Grace"),
                participant("u-3", "Linus"),
            ],
            snippet: String::new(),
            last_active: None,
        };

        assert_eq!(thread.title(Some("u-1")), "Grace, Linus");
        assert_eq!(thread.title(None), "Ada, Grace, Linus");
    }

    #[test]
    fn test_title_falls_back_when_alone() {
        let thread = DirectMessageThread {
            id: Uuid::new_v4(),
            participants: vec![participant("u-1", "Ada")],
            snippet: String::new(),
            last_active: None,
        };

        assert_eq!(thread.title(Some("u-1")), "Direct message");
    }
}
