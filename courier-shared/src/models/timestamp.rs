use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Time elapsed from `earlier` to `self`; negative when `earlier` is later.
    #[must_use]
    pub fn since(&self, earlier: &Self) -> Duration {
        self.0 - earlier.0
    }

    /// Label used by timestamp markers between message groups.
    #[must_use]
    pub fn marker_label(&self) -> String {
        self.0.format("%b %-d, %Y %-I:%M %p").to_string()
    }
}
