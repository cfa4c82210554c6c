use web_sys::window;
use yew::{Children, Html, Properties, classes, function_component, html, use_effect_with};

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    #[prop_or_default]
    pub title: Option<String>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    // Adds data-theme attribute to html tag for theme support
    use_effect_with((), |_| {
        if let Some(html_element) = window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
        {
            html_element
                .set_attribute("data-theme", "dark")
                .unwrap_or_default();
        }
        || {}
    });

    html! {
        <div class="h-screen flex flex-col bg-base-100">
            <header class="navbar bg-base-200 border-b border-base-300 px-4">
                <span class="text-lg font-semibold">
                    { props.title.clone().unwrap_or_else(|| "Courier".to_string()) }
                </span>
            </header>
            <main class={classes!("flex-1", "flex", "flex-col", "min-h-0")}>
                { props.children.clone() }
            </main>
        </div>
    }
}
