//! Reconciliation of incoming direct messages into a pinned, grouped list.

pub mod dedup;
pub mod grouping;
pub mod scroll;
pub mod session;
pub mod subscription;

pub use dedup::{Identified, unique_by_identity, unique_messages};
pub use grouping::{AuthorGrouper, Grouper, MessageGroup};
pub use scroll::{ScrollAnchor, ScrollContainer, ScrollDeps, ScrollPhase, ScrollSynchronizer};
pub use session::{NetworkStatus, ThreadFeed, ThreadSession, ThreadViewState};
pub use subscription::{SubscriptionHandle, SubscriptionToken, ThreadSubscriptions};
