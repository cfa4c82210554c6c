use yew::{Html, function_component, html};

#[function_component(HomePage)]
pub fn home_page() -> Html {
    html! {
        <div class="p-4 text-sm text-base-content/70">
            {"Pick a conversation to see its messages."}
        </div>
    }
}
