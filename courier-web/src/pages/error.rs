use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct ErrorPageProps {
    #[prop_or_else(|| "This page could not be found.".to_string())]
    pub message: String,
}

/// `ErrorPage` page component
#[function_component(ErrorPage)]
pub fn error_page(props: &ErrorPageProps) -> Html {
    html! {
        <div class="p-4 space-y-6">
            <h1 class="text-2xl font-bold">{ "Something went wrong" }</h1>
            <p>{ props.message.clone() }</p>
        </div>
    }
}
