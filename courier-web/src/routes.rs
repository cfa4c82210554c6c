use crate::pages::{ErrorPage, HomePage, ThreadPage};
use yew::prelude::*;
use yew_router::prelude::*;

/// The main routes
#[derive(Debug, Clone, PartialEq, Routable)]
pub enum MainRoute {
    #[at("/")]
    Home,
    #[at("/messages/:thread_id")]
    Thread { thread_id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Switch function for the main routes.
pub fn switch(route: MainRoute) -> Html {
    web_sys::console::log_1(&format!("Switching to main route: {route:?}").into());
    match route {
        MainRoute::Home => html! { <HomePage /> },
        MainRoute::Thread { thread_id } => html! { <ThreadPage {thread_id} /> },
        MainRoute::NotFound => html! { <ErrorPage /> },
    }
}
