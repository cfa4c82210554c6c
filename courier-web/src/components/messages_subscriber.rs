//! Live direct-message thread view.
//!
//! The component is a thin host around [`ThreadSession`]: hooks forward
//! mount, thread switches, fetch results, SSE deliveries, and renders into
//! the session, and the session decides what to draw and when to pin the
//! list to its newest message.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use shared::models::{DirectMessageThread, Message, ThreadError, Timestamp};
use shared::threads::{
    MessageGroup, ScrollContainer, SubscriptionHandle, SubscriptionToken,
    ThreadFeed, ThreadSession, ThreadViewState,
};
use uuid::Uuid;
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, EventSource, MessageEvent};
use yew::functional::{UseForceUpdateHandle, use_force_update};
use yew::{
    Callback, Html, Properties, function_component, html, use_effect, use_effect_with,
    use_memo, use_mut_ref, use_node_ref,
};
use yewdux::prelude::use_selector;

use crate::api::CourierClient;
use crate::components::chat_messages::ChatMessages;
use crate::components::loading::Loading;
use crate::models::app_state::AppState;

type Session = ThreadSession<ElementContainer>;

/// The rendered message list element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementContainer(pub Element);

impl ScrollContainer for ElementContainer {
    fn scroll_top(&self) -> i32 {
        self.0.scroll_top()
    }

    fn scroll_height(&self) -> i32 {
        self.0.scroll_height()
    }

    fn client_height(&self) -> i32 {
        self.0.client_height()
    }

    fn set_scroll_top(&self, offset: i32) {
        self.0.set_scroll_top(offset);
    }
}

/// HTTP and SSE side effects for one mounted view.
struct LiveFeed {
    client: CourierClient,
    session: Weak<RefCell<Session>>,
    redraw: UseForceUpdateHandle,
}

impl ThreadFeed for LiveFeed {
    fn set_last_seen(&self, thread_id: Uuid) {
        let client = self.client.clone();
        spawn_local(async move {
            if let Err(err) = client.set_last_seen(&thread_id).await {
                web_sys::console::warn_1(
                    &format!("Failed to mark thread {thread_id} as seen: {err}").into(),
                );
            }
        });
    }

    fn subscribe_to_new_messages(&self, token: SubscriptionToken) -> SubscriptionHandle {
        let url = self.client.stream_url(&token.thread_id);
        let event_source = match EventSource::new(&url) {
            Ok(event_source) => event_source,
            Err(err) => {
                web_sys::console::error_2(&"Failed to open message stream:".into(), &err);
                return SubscriptionHandle::inert();
            }
        };

        let session = self.session.clone();
        let redraw = self.redraw.clone();
        let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
            let data = e.data().as_string().unwrap_or_default();
            let message = match parse_live_message(&data) {
                Ok(message) => message,
                Err(err) => {
                    web_sys::console::error_1(&err.to_string().into());
                    return;
                }
            };
            let Some(session) = session.upgrade() else {
                return;
            };
            let accepted = session.borrow_mut().deliver(&token, message);
            if accepted {
                redraw.force_update();
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_2(&"Message stream error:".into(), &e);
        }) as Box<dyn FnMut(JsValue)>);

        let event = self.client.config().stream_event.clone();
        if let Err(err) = event_source
            .add_event_listener_with_callback(&event, on_message.as_ref().unchecked_ref())
        {
            web_sys::console::error_2(&"Failed to listen for new messages:".into(), &err);
        }
        event_source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let closures = (on_message, on_error);
        SubscriptionHandle::new(move || {
            web_sys::console::log_1(&format!("Closing message stream for {}", token.thread_id).into());
            event_source.close();
            drop(closures);
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct MessagesSubscriberProps {
    pub thread_id: Uuid,
    #[prop_or(None)]
    pub thread: Option<DirectMessageThread>,
}

#[function_component(MessagesSubscriber)]
pub fn messages_subscriber(props: &MessagesSubscriberProps) -> Html {
    let client = use_memo((), |()| CourierClient::shared());
    let session = use_mut_ref(|| Session::new(client.config().grouper()));
    let list_ref = use_node_ref();
    let redraw = use_force_update();
    let current_user = use_selector(|state: &AppState| state.current_user_id().map(str::to_owned));

    // Bind on mount and on every thread switch; the cleanup releases the old
    // thread before the next bind runs.
    {
        let session = session.clone();
        let client = (*client).clone();
        let redraw = redraw.clone();
        use_effect_with(props.thread_id, move |thread_id| {
            let thread_id = *thread_id;
            let feed = LiveFeed {
                client: client.clone(),
                session: Rc::downgrade(&session),
                redraw: redraw.clone(),
            };
            let token = session.borrow_mut().bind_thread(thread_id, &feed);

            let weak = Rc::downgrade(&session);
            spawn_local(async move {
                let result = client.get_thread_messages(&thread_id, None).await;
                let Some(session) = weak.upgrade() else {
                    return;
                };
                match result {
                    Ok(connection) => {
                        session.borrow_mut().apply_connection(&token, connection);
                    }
                    Err(err) => {
                        web_sys::console::error_1(
                            &format!("Failed to load messages for {thread_id}: {err}").into(),
                        );
                        session.borrow_mut().fetch_failed(&token);
                    }
                }
                redraw.force_update();
            });

            move || {
                session.borrow_mut().unbind_thread();
            }
        });
    }

    {
        let session = session.clone();
        use_effect_with((), move |()| {
            move || {
                session.borrow_mut().teardown();
            }
        });
    }

    // Runs after every render so the synchronizer sees the new height.
    {
        let session = session.clone();
        let list_ref = list_ref.clone();
        use_effect(move || {
            if let Some(element) = list_ref.cast::<Element>() {
                session
                    .borrow_mut()
                    .attach_container(ElementContainer(element));
            }
            || ()
        });
    }

    let on_load_more = {
        let session = session.clone();
        let client = (*client).clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            let Some((token, cursor)) = session.borrow_mut().begin_fetch_more() else {
                return;
            };
            redraw.force_update();

            let weak = Rc::downgrade(&session);
            let client = client.clone();
            let redraw = redraw.clone();
            spawn_local(async move {
                let result = client
                    .get_thread_messages(&token.thread_id, cursor.as_deref())
                    .await;
                let Some(session) = weak.upgrade() else {
                    return;
                };
                match result {
                    Ok(page) => {
                        session.borrow_mut().append_page(&token, page);
                    }
                    Err(err) => {
                        web_sys::console::error_1(
                            &format!("Failed to load earlier messages: {err}").into(),
                        );
                        session.borrow_mut().fetch_more_failed(&token);
                    }
                }
                redraw.force_update();
            });
        })
    };

    let (state, has_next_page, status) = {
        let session = session.borrow();
        (
            session.view(),
            session.connection().has_next_page(),
            session.status(),
        )
    };

    match state {
        ThreadViewState::Error => html! {
            <div ref={list_ref} class="flex-1 overflow-y-auto" data-state="error"></div>
        },
        ThreadViewState::Loading => html! {
            <div ref={list_ref} class="flex-1 overflow-y-auto" data-state="loading">
                <Loading label="Loading messages" />
            </div>
        },
        ThreadViewState::Ready {
            groups,
            unique_count,
        } => {
            let seen = props
                .thread
                .as_ref()
                .map(|thread| seen_by(thread, current_user.as_deref(), latest_timestamp(&groups)))
                .unwrap_or_default();
            html! {
                <div
                    ref={list_ref}
                    class="flex-1 overflow-y-auto"
                    data-state="ready"
                    data-message-count={unique_count.to_string()}
                >
                    {
                        if has_next_page {
                            html! {
                                <div class="flex justify-center p-2">
                                    <button
                                        class="btn btn-ghost btn-sm"
                                        disabled={status.is_fetching_more}
                                        onclick={on_load_more}
                                    >
                                        { if status.is_fetching_more { "Loading…" } else { "Load earlier messages" } }
                                    </button>
                                </div>
                            }
                        } else {
                            Html::default()
                        }
                    }
                    <ChatMessages {groups} current_user={(*current_user).clone()} />
                    {
                        if seen.is_empty() {
                            Html::default()
                        } else {
                            html! {
                                <div class="px-4 pb-2 text-right text-xs text-base-content/50">
                                    { format!("Seen by {}", seen.join(", ")) }
                                </div>
                            }
                        }
                    }
                </div>
            }
        }
    }
}

fn parse_live_message(data: &str) -> Result<Message, ThreadError> {
    Ok(serde_json::from_str(data)?)
}

fn latest_timestamp(groups: &[MessageGroup]) -> Option<Timestamp> {
    groups
        .iter()
        .rev()
        .find_map(|group| group.messages().last())
        .map(|message| message.timestamp)
}

/// Names of the other participants who have seen the newest message.
fn seen_by(
    thread: &DirectMessageThread,
    current_user: Option<&str>,
    latest: Option<Timestamp>,
) -> Vec<String> {
    let Some(latest) = latest else {
        return Vec::new();
    };
    thread
        .others(current_user)
        .filter(|participant| participant.last_seen.is_some_and(|seen| seen >= latest))
        .map(|participant| participant.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::models::{Author, MessageContent, MessageType, Participant};

    fn at(minute: u32) -> Timestamp {
        Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap())
    }

    fn message(id: &str, author: &str, minute: u32) -> Message {
        Message {
            id: id.to_string(),
            timestamp: at(minute),
            author: Author {
                id: author.to_string(),
                name: author.to_uppercase(),
                username: None,
                avatar_url: None,
            },
            message_type: MessageType::Text,
            content: MessageContent {
                body: format!("body {id}"),
            },
        }
    }

    fn participant(id: &str, name: &str, last_seen: Option<Timestamp>) -> Participant {
        Participant {
            user_id: id.to_string(),
            name: name.to_string(),
            username: None,
            avatar_url: None,
            last_seen,
        }
    }

    #[test]
    fn test_parse_live_message() {
        let message = parse_live_message(
            r#"{"id":"m1","timestamp":"2024-03-01T12:00:00Z","author":{"id":"u1","name":"Ada"},"content":{"body":"hi"}}"#,
        )
        .unwrap();
        assert_eq!(message.id, "m1");
        assert_eq!(message.message_type, MessageType::Text);

        let err = parse_live_message("{not json").unwrap_err();
        assert!(matches!(err, ThreadError::InvalidPayload { .. }));
    }

    #[test]
    fn test_latest_timestamp_skips_markers() {
        let groups = vec![
            MessageGroup::Marker { timestamp: at(0) },
            MessageGroup::Run {
                author: message("1", "a", 1).author,
                messages: vec![message("1", "a", 1), message("2", "a", 5)],
            },
        ];
        assert_eq!(latest_timestamp(&groups), Some(at(5)));
        assert_eq!(latest_timestamp(&[]), None);
    }

    #[test]
    fn test_seen_by_excludes_viewer_and_stale_participants() {
        let thread = DirectMessageThread {
            id: Uuid::nil(),
            participants: vec![
                participant("me", "Me", Some(at(30))),
                participant("u1", "Ada", Some(at(10))),
                participant("u2", "Grace", Some(at(2))),
                participant("u3", "Linus", None),
            ],
            snippet: String::new(),
            last_active: None,
        };

        assert_eq!(seen_by(&thread, Some("me"), Some(at(10))), vec!["Ada"]);
        assert!(seen_by(&thread, Some("me"), None).is_empty());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn scrollable() -> Element {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document");
        let outer = document.create_element("div").expect("div");
        outer
            .set_attribute("style", "height: 400px; overflow-y: auto;")
            .expect("style");
        let inner = document.create_element("div").expect("div");
        inner.set_attribute("style", "height: 1000px;").expect("style");
        outer.append_child(&inner).expect("append");
        document.body().expect("body").append_child(&outer).expect("append");
        outer
    }

    #[wasm_bindgen_test]
    fn test_element_container_scrolls_to_bottom() {
        let container = ElementContainer(scrollable());
        let offset = container.anchor().bottom_offset();
        container.set_scroll_top(offset);

        assert_eq!(offset, 600);
        assert_eq!(container.scroll_top(), 600);
        assert_eq!(container.anchor().bottom_offset(), container.scroll_top());
    }
}
