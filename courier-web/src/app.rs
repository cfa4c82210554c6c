use crate::api::CourierClient;
use crate::models::app_state::AppState;
use crate::routes::{MainRoute, switch};
use wasm_bindgen_futures::spawn_local;
use yew::{Html, function_component, html, use_effect_with};
use yew_router::prelude::*;
use yewdux::prelude::use_store;

#[function_component(App)]
pub fn app() -> Html {
    let (_store_state, store_dispatch) = use_store::<AppState>();

    {
        let store_dispatch = store_dispatch.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match CourierClient::shared().get_current_user().await {
                    Ok(user) => store_dispatch.set(AppState {
                        current_user: Some(user),
                    }),
                    Err(err) => web_sys::console::warn_1(
                        &format!("Continuing without a signed-in user: {err}").into(),
                    ),
                }
            });
            || ()
        });
    }

    html! {
        <BrowserRouter>
            <Switch<MainRoute> render={switch} />
        </BrowserRouter>
    }
}
