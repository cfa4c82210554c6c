//! Keeps a message list pinned to its newest entry.
//!
//! The synchronizer owns the scroll container handle outright and only
//! writes the offset on trigger events: binding a container, switching
//! threads, a new message revision, a loading flip, or a change in content
//! height. Manual scrolling between those events is left alone.

use std::rc::Rc;

use tracing::debug;
use uuid::Uuid;

/// Access to a scrollable element.
pub trait ScrollContainer {
    fn scroll_top(&self) -> i32;
    fn scroll_height(&self) -> i32;
    fn client_height(&self) -> i32;
    fn set_scroll_top(&self, offset: i32);

    fn anchor(&self) -> ScrollAnchor {
        ScrollAnchor {
            scroll_top: self.scroll_top(),
            scroll_height: self.scroll_height(),
            client_height: self.client_height(),
        }
    }
}

impl<T: ScrollContainer + ?Sized> ScrollContainer for Rc<T> {
    fn scroll_top(&self) -> i32 {
        (**self).scroll_top()
    }

    fn scroll_height(&self) -> i32 {
        (**self).scroll_height()
    }

    fn client_height(&self) -> i32 {
        (**self).client_height()
    }

    fn set_scroll_top(&self, offset: i32) {
        (**self).set_scroll_top(offset);
    }
}

/// Geometry of the scroll container at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollAnchor {
    pub scroll_top: i32,
    pub scroll_height: i32,
    pub client_height: i32,
}

impl ScrollAnchor {
    /// Offset at which the end of the content is flush with the viewport.
    #[must_use]
    pub fn bottom_offset(&self) -> i32 {
        self.scroll_height.saturating_sub(self.client_height).max(0)
    }
}

/// Inputs whose change may alter the rendered height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollDeps {
    pub thread_id: Uuid,
    /// Bumped whenever the message list is replaced or extended.
    pub revision: u64,
    pub is_loading: bool,
    pub has_error: bool,
}

/// Lifecycle phase of the synchronizer, without the container payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Uninitialized,
    Bound,
    Unbound,
}

#[derive(Debug)]
enum ScrollState<C> {
    Uninitialized,
    Bound(C),
    Unbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    deps: ScrollDeps,
    content_height: i32,
}

#[derive(Debug)]
pub struct ScrollSynchronizer<C> {
    state: ScrollState<C>,
    last: Option<Snapshot>,
}

impl<C> Default for ScrollSynchronizer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ScrollSynchronizer<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ScrollState::Uninitialized,
            last: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> ScrollPhase {
        match self.state {
            ScrollState::Uninitialized => ScrollPhase::Uninitialized,
            ScrollState::Bound(_) => ScrollPhase::Bound,
            ScrollState::Unbound => ScrollPhase::Unbound,
        }
    }

    #[must_use]
    pub fn container(&self) -> Option<&C> {
        match &self.state {
            ScrollState::Bound(container) => Some(container),
            _ => None,
        }
    }

    /// Tear down. Terminal: later binds and observations are ignored.
    pub fn unbind(&mut self) {
        if !matches!(self.state, ScrollState::Unbound) {
            debug!("scroll container unbound");
        }
        self.state = ScrollState::Unbound;
        self.last = None;
    }
}

impl<C: ScrollContainer> ScrollSynchronizer<C> {
    /// Adopt `container` and pin it to the bottom if there is content.
    ///
    /// Binding while already bound swaps in the new container, so a stale
    /// handle left over from a previous render is never written again.
    pub fn bind(&mut self, container: C, deps: ScrollDeps, has_messages: bool) -> Option<i32> {
        if matches!(self.state, ScrollState::Unbound) {
            debug!("ignoring bind after teardown");
            return None;
        }
        let content_height = container.scroll_height();
        self.state = ScrollState::Bound(container);
        self.last = Some(Snapshot {
            deps,
            content_height,
        });
        self.scroll_to_bottom(has_messages)
    }

    /// Re-pin when `deps` or the content height changed since the last call.
    pub fn observe(&mut self, deps: ScrollDeps, has_messages: bool) -> Option<i32> {
        let ScrollState::Bound(container) = &self.state else {
            return None;
        };
        let snapshot = Snapshot {
            deps,
            content_height: container.scroll_height(),
        };
        if self.last == Some(snapshot) {
            return None;
        }
        self.last = Some(snapshot);
        self.scroll_to_bottom(has_messages)
    }

    /// Set the offset to `scroll_height - client_height`.
    ///
    /// Does nothing without a bound container or without messages. Returns
    /// the offset written, if any.
    pub fn scroll_to_bottom(&self, has_messages: bool) -> Option<i32> {
        let ScrollState::Bound(container) = &self.state else {
            return None;
        };
        if !has_messages {
            return None;
        }
        let offset = container.anchor().bottom_offset();
        container.set_scroll_top(offset);
        debug!(offset, "scrolled message list to bottom");
        Some(offset)
    }
}

impl<C: PartialEq> ScrollSynchronizer<C> {
    /// Whether `container` is the one currently bound.
    pub fn is_bound_to(&self, container: &C) -> bool {
        self.container().is_some_and(|current| current == container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Default, PartialEq)]
    struct FakePane {
        scroll_top: Cell<i32>,
        scroll_height: Cell<i32>,
        client_height: Cell<i32>,
        writes: Cell<u32>,
    }

    impl FakePane {
        fn sized(scroll_height: i32, client_height: i32) -> Rc<Self> {
            let pane = Self::default();
            pane.scroll_height.set(scroll_height);
            pane.client_height.set(client_height);
            Rc::new(pane)
        }
    }

    impl ScrollContainer for FakePane {
        fn scroll_top(&self) -> i32 {
            self.scroll_top.get()
        }

        fn scroll_height(&self) -> i32 {
            self.scroll_height.get()
        }

        fn client_height(&self) -> i32 {
            self.client_height.get()
        }

        fn set_scroll_top(&self, offset: i32) {
            self.writes.set(self.writes.get() + 1);
            self.scroll_top.set(offset);
        }
    }

    fn deps(thread_id: Uuid, revision: u64, is_loading: bool) -> ScrollDeps {
        ScrollDeps {
            thread_id,
            revision,
            is_loading,
            has_error: false,
        }
    }

    #[test]
    fn test_bind_pins_to_bottom() {
        let pane = FakePane::sized(1000, 400);
        let mut sync = ScrollSynchronizer::new();

        let offset = sync.bind(pane.clone(), deps(Uuid::new_v4(), 1, false), true);

        assert_eq!(offset, Some(600));
        assert_eq!(pane.scroll_top.get(), 600);
        assert_eq!(sync.phase(), ScrollPhase::Bound);
    }

    #[test]
    fn test_no_messages_is_a_no_op() {
        let pane = FakePane::sized(1000, 400);
        pane.scroll_top.set(123);
        let mut sync = ScrollSynchronizer::new();

        let offset = sync.bind(pane.clone(), deps(Uuid::new_v4(), 0, false), false);

        assert_eq!(offset, None);
        assert_eq!(pane.scroll_top.get(), 123);
        assert_eq!(pane.writes.get(), 0);
    }

    #[test]
    fn test_unbound_is_a_no_op() {
        let sync: ScrollSynchronizer<Rc<FakePane>> = ScrollSynchronizer::new();

        assert_eq!(sync.phase(), ScrollPhase::Uninitialized);
        assert_eq!(sync.scroll_to_bottom(true), None);
    }

    #[test]
    fn test_observe_without_change_leaves_user_scroll_alone() {
        let pane = FakePane::sized(1000, 400);
        let thread = Uuid::new_v4();
        let mut sync = ScrollSynchronizer::new();
        sync.bind(pane.clone(), deps(thread, 1, false), true);

        pane.scroll_top.set(100);
        let offset = sync.observe(deps(thread, 1, false), true);

        assert_eq!(offset, None);
        assert_eq!(pane.scroll_top.get(), 100);
        assert_eq!(pane.writes.get(), 1);
    }

    #[test]
    fn test_new_message_rescrolls_with_new_height() {
        let pane = FakePane::sized(1000, 400);
        let thread = Uuid::new_v4();
        let mut sync = ScrollSynchronizer::new();
        sync.bind(pane.clone(), deps(thread, 1, false), true);

        pane.scroll_height.set(1080);
        let offset = sync.observe(deps(thread, 2, false), true);

        assert_eq!(offset, Some(680));
        assert_eq!(pane.scroll_top.get(), 680);
    }

    #[test]
    fn test_each_trigger_rescrolls() {
        let pane = FakePane::sized(900, 300);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut sync = ScrollSynchronizer::new();
        sync.bind(pane.clone(), deps(first, 1, true), true);

        assert!(sync.observe(deps(first, 1, false), true).is_some());
        assert!(sync.observe(deps(second, 1, false), true).is_some());

        pane.scroll_height.set(950);
        assert!(sync.observe(deps(second, 1, false), true).is_some());
        assert_eq!(pane.writes.get(), 4);
    }

    #[test]
    fn test_content_shorter_than_viewport_clamps_to_zero() {
        let pane = FakePane::sized(200, 400);
        let mut sync = ScrollSynchronizer::new();

        assert_eq!(sync.bind(pane, deps(Uuid::new_v4(), 1, false), true), Some(0));
    }

    #[test]
    fn test_unbind_is_terminal() {
        let pane = FakePane::sized(1000, 400);
        let thread = Uuid::new_v4();
        let mut sync = ScrollSynchronizer::new();
        sync.bind(pane.clone(), deps(thread, 1, false), true);

        sync.unbind();
        pane.scroll_height.set(2000);

        assert_eq!(sync.phase(), ScrollPhase::Unbound);
        assert_eq!(sync.observe(deps(thread, 2, false), true), None);
        assert_eq!(sync.bind(pane.clone(), deps(thread, 3, false), true), None);
        assert_eq!(pane.writes.get(), 1);
    }

    #[test]
    fn test_rebind_replaces_stale_container() {
        let stale = FakePane::sized(1000, 400);
        let fresh = FakePane::sized(500, 100);
        let thread = Uuid::new_v4();
        let mut sync = ScrollSynchronizer::new();
        sync.bind(stale.clone(), deps(thread, 1, false), true);

        sync.bind(fresh.clone(), deps(thread, 2, false), true);
        fresh.scroll_height.set(700);
        sync.observe(deps(thread, 3, false), true);

        assert_eq!(stale.writes.get(), 1);
        assert_eq!(fresh.scroll_top.get(), 600);
        assert!(sync.is_bound_to(&fresh));
        assert!(!sync.is_bound_to(&stale));
    }

    #[test]
    fn test_anchor_clamps_short_content() {
        let anchor = ScrollAnchor {
            scroll_top: 0,
            scroll_height: 200,
            client_height: 400,
        };
        assert_eq!(anchor.bottom_offset(), 0);
    }
}
