//! Live-update subscription bookkeeping for a single thread view.

use std::fmt;

use tracing::debug;
use uuid::Uuid;

/// Terminates one live feed when released.
///
/// Releasing is idempotent and also happens on drop, so the feed is closed
/// exactly once whichever comes first.
pub struct SubscriptionHandle {
    release: Option<Box<dyn FnOnce()>>,
}

impl SubscriptionHandle {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release, for feeds that failed to open.
    #[must_use]
    pub fn inert() -> Self {
        Self { release: None }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Returns `true` only for the call that actually closed the feed.
    pub fn release(&mut self) -> bool {
        match self.release.take() {
            Some(release) => {
                release();
                true
            }
            None => false,
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Identifies one opened subscription. Deliveries carry it so anything that
/// arrives after the subscription was released can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    pub thread_id: Uuid,
    epoch: u64,
}

impl SubscriptionToken {
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// At most one open subscription, keyed by thread.
#[derive(Debug, Default)]
pub struct ThreadSubscriptions {
    active: Option<(SubscriptionToken, SubscriptionHandle)>,
    epoch: u64,
}

impl ThreadSubscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<SubscriptionToken> {
        self.active.as_ref().map(|(token, _)| *token)
    }

    #[must_use]
    pub fn active_thread(&self) -> Option<Uuid> {
        self.active().map(|token| token.thread_id)
    }

    /// Open the feed for `thread_id` unless it is already open.
    ///
    /// A feed for another thread is released before `subscribe` runs.
    /// Returns the token of the open subscription and whether it was newly
    /// opened by this call.
    pub fn open<F>(&mut self, thread_id: Uuid, subscribe: F) -> (SubscriptionToken, bool)
    where
        F: FnOnce(SubscriptionToken) -> SubscriptionHandle,
    {
        if let Some(token) = self.active()
            && token.thread_id == thread_id
        {
            return (token, false);
        }
        self.close();

        self.epoch += 1;
        let token = SubscriptionToken {
            thread_id,
            epoch: self.epoch,
        };
        let handle = subscribe(token);
        debug!(%thread_id, epoch = token.epoch, "opened live message subscription");
        self.active = Some((token, handle));
        (token, true)
    }

    /// Release the open feed, if any.
    pub fn close(&mut self) -> Option<SubscriptionToken> {
        let (token, mut handle) = self.active.take()?;
        handle.release();
        debug!(thread_id = %token.thread_id, epoch = token.epoch, "released live message subscription");
        Some(token)
    }

    /// Whether a delivery stamped with `token` belongs to the open feed.
    #[must_use]
    pub fn accepts(&self, token: &SubscriptionToken) -> bool {
        self.active().is_some_and(|current| current == *token)
    }
}
