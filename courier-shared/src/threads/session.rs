//! The reconciliation core of a direct-message thread view.
//!
//! [`ThreadSession`] ties the fetched message connection, live deliveries,
//! deduplication, grouping, and scroll pinning together behind the handful
//! of events a rendering layer produces: bind a thread, attach a container,
//! receive data, re-render, tear down.

use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    dedup::unique_messages,
    grouping::{AuthorGrouper, Grouper, MessageGroup},
    scroll::{ScrollContainer, ScrollDeps, ScrollPhase, ScrollSynchronizer},
    subscription::{SubscriptionHandle, SubscriptionToken, ThreadSubscriptions},
};
use crate::models::{Message, MessageConnection};

/// Side effects the session asks of its host.
pub trait ThreadFeed {
    /// Record that the viewer has seen `thread_id`.
    ///
    /// Fire-and-forget: the session never retries and never learns the
    /// outcome, so implementors must report their own failures.
    fn set_last_seen(&self, thread_id: Uuid);

    /// Start pushing new messages for `token.thread_id`. Deliveries must be
    /// handed back through [`ThreadSession::deliver`] with the same token.
    fn subscribe_to_new_messages(&self, token: SubscriptionToken) -> SubscriptionHandle;
}

/// Loading and error flags reported by the network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkStatus {
    pub is_loading: bool,
    pub has_error: bool,
    pub is_fetching_more: bool,
}

impl NetworkStatus {
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            is_loading: true,
            has_error: false,
            is_fetching_more: false,
        }
    }

    #[must_use]
    pub const fn ready() -> Self {
        Self {
            is_loading: false,
            has_error: false,
            is_fetching_more: false,
        }
    }

    #[must_use]
    pub const fn failed() -> Self {
        Self {
            is_loading: false,
            has_error: true,
            is_fetching_more: false,
        }
    }
}

/// What the rendering layer should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadViewState {
    Error,
    Loading,
    Ready {
        groups: Vec<MessageGroup>,
        unique_count: usize,
    },
}

#[derive(Debug)]
pub struct ThreadSession<C, G = AuthorGrouper> {
    thread_id: Option<Uuid>,
    subscriptions: ThreadSubscriptions,
    scroll: ScrollSynchronizer<C>,
    connection: MessageConnection,
    live: Vec<Message>,
    revision: u64,
    status: NetworkStatus,
    grouper: G,
}

impl<C> Default for ThreadSession<C, AuthorGrouper> {
    fn default() -> Self {
        Self::new(AuthorGrouper::default())
    }
}

impl<C, G> ThreadSession<C, G> {
    pub fn new(grouper: G) -> Self {
        Self {
            thread_id: None,
            subscriptions: ThreadSubscriptions::new(),
            scroll: ScrollSynchronizer::new(),
            connection: MessageConnection::default(),
            live: Vec::new(),
            revision: 0,
            status: NetworkStatus::loading(),
            grouper,
        }
    }

    #[must_use]
    pub const fn thread_id(&self) -> Option<Uuid> {
        self.thread_id
    }

    #[must_use]
    pub const fn status(&self) -> NetworkStatus {
        self.status
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn scroll_phase(&self) -> ScrollPhase {
        self.scroll.phase()
    }

    #[must_use]
    pub fn connection(&self) -> &MessageConnection {
        &self.connection
    }

    #[must_use]
    pub fn active_subscription(&self) -> Option<SubscriptionToken> {
        self.subscriptions.active()
    }

    #[must_use]
    pub fn has_messages(&self) -> bool {
        self.connection.has_nodes() || !self.live.is_empty()
    }

    /// Release the thread's subscription and forget its data.
    ///
    /// Safe to call repeatedly or before any bind.
    pub fn unbind_thread(&mut self) {
        self.subscriptions.close();
        if let Some(thread_id) = self.thread_id.take() {
            debug!(%thread_id, "unbound thread");
            self.connection = MessageConnection::default();
            self.live.clear();
            self.revision += 1;
            self.status = NetworkStatus::loading();
        }
    }

    /// Replace the fetched connection. Results requested under any bind
    /// other than the open one are stale and dropped.
    pub fn apply_connection(
        &mut self,
        token: &SubscriptionToken,
        connection: MessageConnection,
    ) -> bool {
        if !self.subscriptions.accepts(token) {
            debug!(thread_id = %token.thread_id, epoch = token.epoch(), "dropping stale fetch result");
            return false;
        }
        self.connection = connection;
        self.revision += 1;
        self.status = NetworkStatus::ready();
        true
    }

    /// Merge a follow-up page into the fetched connection.
    pub fn append_page(&mut self, token: &SubscriptionToken, page: MessageConnection) -> bool {
        if !self.subscriptions.accepts(token) {
            debug!(thread_id = %token.thread_id, epoch = token.epoch(), "dropping stale page");
            return false;
        }
        self.connection.append_page(page);
        self.revision += 1;
        self.status.is_fetching_more = false;
        true
    }

    /// Record a failed initial fetch for the bind identified by `token`.
    pub fn fetch_failed(&mut self, token: &SubscriptionToken) -> bool {
        if !self.subscriptions.accepts(token) {
            return false;
        }
        self.status = NetworkStatus::failed();
        true
    }

    /// Mark a follow-up page as in flight and return the cursor it should
    /// start after. `None` when there is nothing more to fetch or a fetch is
    /// already running.
    pub fn begin_fetch_more(&mut self) -> Option<(SubscriptionToken, Option<String>)> {
        let token = self.subscriptions.active()?;
        if self.status.is_loading
            || self.status.has_error
            || self.status.is_fetching_more
            || !self.connection.has_next_page()
        {
            return None;
        }
        self.status.is_fetching_more = true;
        let cursor = self.connection.last_cursor().map(str::to_owned);
        Some((token, cursor))
    }

    /// A follow-up page failed; allow another attempt.
    pub fn fetch_more_failed(&mut self, token: &SubscriptionToken) -> bool {
        if !self.subscriptions.accepts(token) {
            return false;
        }
        self.status.is_fetching_more = false;
        true
    }

    /// Accept a pushed message if it belongs to the open subscription.
    pub fn deliver(&mut self, token: &SubscriptionToken, message: Message) -> bool {
        if !self.subscriptions.accepts(token) {
            warn!(thread_id = %token.thread_id, "discarding delivery for released subscription");
            return false;
        }
        if let Err(err) = message.validate() {
            warn!(error = %err, "discarding malformed live message");
            return false;
        }
        self.live.push(message);
        self.revision += 1;
        true
    }

    #[must_use]
    pub fn scroll_deps(&self) -> Option<ScrollDeps> {
        self.thread_id.map(|thread_id| ScrollDeps {
            thread_id,
            revision: self.revision,
            is_loading: self.status.is_loading,
            has_error: self.status.has_error,
        })
    }

    /// Whether the list is showing messages that may be pinned. Placeholders
    /// for loading and failed fetches are never scrolled.
    fn pinnable(&self) -> bool {
        !self.status.is_loading && !self.status.has_error && self.has_messages()
    }

    /// Fetched nodes followed by live deliveries, duplicates included.
    fn merged(&self) -> Vec<Message> {
        let mut messages = self.connection.nodes();
        messages.extend(self.live.iter().cloned());
        messages
    }
}

impl<C, G: Grouper> ThreadSession<C, G> {
    /// Deduplicate and group the current messages.
    ///
    /// No processing happens while the network layer reports an error or a
    /// load in progress.
    pub fn view(&self) -> ThreadViewState {
        if self.status.has_error {
            return ThreadViewState::Error;
        }
        if self.status.is_loading {
            return ThreadViewState::Loading;
        }
        let unique = unique_messages(&self.merged());
        let unique_count = unique.len();
        ThreadViewState::Ready {
            groups: self.grouper.group(unique),
            unique_count,
        }
    }
}

impl<C: ScrollContainer, G> ThreadSession<C, G> {
    /// Make `thread_id` the active thread.
    ///
    /// Marks it seen, opens its live feed, then pins the list, in that order.
    /// Binding the already active thread does nothing; binding another thread
    /// releases the previous feed first.
    pub fn bind_thread<F: ThreadFeed + ?Sized>(&mut self, thread_id: Uuid, feed: &F) -> SubscriptionToken {
        if self.thread_id == Some(thread_id)
            && let Some(token) = self.subscriptions.active()
        {
            return token;
        }
        self.unbind_thread();

        self.thread_id = Some(thread_id);
        self.revision += 1;
        debug!(%thread_id, "bound thread");

        feed.set_last_seen(thread_id);
        let (token, _) = self
            .subscriptions
            .open(thread_id, |token| feed.subscribe_to_new_messages(token));
        self.scroll.scroll_to_bottom(self.pinnable());
        token
    }

    /// Adopt the scroll container rendered for this view.
    pub fn attach_container(&mut self, container: C) -> Option<i32>
    where
        C: PartialEq,
    {
        if self.scroll.is_bound_to(&container) {
            return self.sync_scroll();
        }
        let deps = self.scroll_deps()?;
        let pinnable = self.pinnable();
        self.scroll.bind(container, deps, pinnable)
    }

    /// Re-pin if anything that affects the rendered height changed.
    ///
    /// The snapshot is still recorded while a placeholder is shown, so the
    /// flip back to a ready list re-pins.
    pub fn sync_scroll(&mut self) -> Option<i32> {
        let deps = self.scroll_deps()?;
        let pinnable = self.pinnable();
        self.scroll.observe(deps, pinnable)
    }

    /// Unmount: release the feed and stop touching the container.
    pub fn teardown(&mut self) {
        self.unbind_thread();
        self.scroll.unbind();
    }
}
