//! Ordering and clustering of deduplicated messages for display.

use chrono::Duration;

use crate::models::{Author, Message, Timestamp};

/// One display cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageGroup {
    /// A time marker rendered between runs.
    Marker { timestamp: Timestamp },
    /// Consecutive messages sent by one author.
    Run {
        author: Author,
        messages: Vec<Message>,
    },
}

impl MessageGroup {
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        match self {
            Self::Marker { .. } => &[],
            Self::Run { messages, .. } => messages,
        }
    }
}

/// Turns a deduplicated message sequence into chronologically ordered groups.
pub trait Grouper {
    fn group(&self, messages: Vec<Message>) -> Vec<MessageGroup>;
}

/// Groups consecutive messages by author and splits runs on long silences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorGrouper {
    gap: Duration,
}

impl AuthorGrouper {
    pub const DEFAULT_GAP_SECONDS: u64 = 3600;

    #[must_use]
    pub fn new(gap: Duration) -> Self {
        Self { gap }
    }

    #[must_use]
    pub fn with_gap_seconds(seconds: u64) -> Self {
        let gap = i64::try_from(seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self::new(gap)
    }

    #[must_use]
    pub const fn gap(&self) -> Duration {
        self.gap
    }
}

impl Default for AuthorGrouper {
    fn default() -> Self {
        Self::with_gap_seconds(Self::DEFAULT_GAP_SECONDS)
    }
}

impl Grouper for AuthorGrouper {
    fn group(&self, mut messages: Vec<Message>) -> Vec<MessageGroup> {
        messages.sort_by_key(|message| message.timestamp);

        let mut groups = Vec::new();
        let mut run: Vec<Message> = Vec::new();
        let mut previous: Option<Timestamp> = None;

        for message in messages {
            let stale = previous.is_some_and(|prev| message.timestamp.since(&prev) > self.gap);
            let same_author = run
                .last()
                .is_some_and(|last| last.author.id == message.author.id);

            if previous.is_none() || stale || !same_author {
                flush(&mut groups, &mut run);
            }
            if previous.is_none() || stale {
                groups.push(MessageGroup::Marker {
                    timestamp: message.timestamp,
                });
            }

            previous = Some(message.timestamp);
            run.push(message);
        }
        flush(&mut groups, &mut run);

        groups
    }
}

fn flush(groups: &mut Vec<MessageGroup>, run: &mut Vec<Message>) {
    if let Some(first) = run.first() {
        let author = first.author.clone();
        groups.push(MessageGroup::Run {
            author,
            messages: std::mem::take(run),
        });
    }
}
