use shared::models::DirectMessageThread;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::{Html, Properties, function_component, html, use_effect_with, use_state};
use yewdux::prelude::use_selector;

use crate::api::CourierClient;
use crate::components::MessagesSubscriber;
use crate::containers::layout::Layout;
use crate::models::app_state::AppState;
use crate::pages::ErrorPage;

#[derive(Properties, PartialEq)]
pub struct ThreadPageProps {
    pub thread_id: String,
}

/// Hosts the message view for `/messages/:thread_id` and loads the thread
/// metadata used for the header.
#[function_component(ThreadPage)]
pub fn thread_page(props: &ThreadPageProps) -> Html {
    let thread_id = Uuid::parse_str(&props.thread_id).ok();
    let thread = use_state(|| None::<DirectMessageThread>);
    let current_user = use_selector(|state: &AppState| state.current_user_id().map(str::to_owned));

    {
        let thread = thread.clone();
        use_effect_with(thread_id, move |thread_id| {
            thread.set(None);
            if let Some(thread_id) = *thread_id {
                spawn_local(async move {
                    match CourierClient::shared().get_thread(&thread_id).await {
                        Ok(metadata) => thread.set(Some(metadata)),
                        Err(err) => web_sys::console::warn_1(
                            &format!("Failed to load thread {thread_id}: {err}").into(),
                        ),
                    }
                });
            }
            || ()
        });
    }

    let Some(thread_id) = thread_id else {
        return html! { <ErrorPage message={format!("\"{}\" is not a conversation.", props.thread_id)} /> };
    };

    let title = (*thread)
        .as_ref()
        .map(|thread| thread.title(current_user.as_deref()));

    html! {
        <Layout {title}>
            <MessagesSubscriber {thread_id} thread={(*thread).clone()} />
        </Layout>
    }
}
