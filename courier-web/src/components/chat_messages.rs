use shared::models::{Message, MessageType};
use shared::threads::MessageGroup;
use yew::{Html, Properties, classes, function_component, html};

#[derive(Properties, PartialEq)]
pub struct ChatMessagesProps {
    pub groups: Vec<MessageGroup>,
    #[prop_or(None)]
    pub current_user: Option<String>,
}

/// Renders grouped messages: time markers between author runs.
#[function_component(ChatMessages)]
pub fn chat_messages(props: &ChatMessagesProps) -> Html {
    if props.groups.is_empty() {
        return html! {
            <div class="p-4 text-sm text-base-content/70">
                {"No messages yet. Say hello to start the conversation."}
            </div>
        };
    }

    html! {
        <ul class="flex flex-col gap-3 p-4">
            { for props.groups.iter().map(|group| match group {
                MessageGroup::Marker { timestamp } => html! {
                    <li class="divider text-xs text-base-content/50">
                        { timestamp.marker_label() }
                    </li>
                },
                MessageGroup::Run { author, messages } => {
                    let is_me = props.current_user.as_deref() == Some(author.id.as_str());
                    let class = if is_me {
                        classes!("chat", "chat-end")
                    } else {
                        classes!("chat", "chat-start")
                    };
                    html! {
                        <li class={class} data-author={author.id.clone()}>
                            <div class="chat-header text-xs font-medium">{ author.name.clone() }</div>
                            { for messages.iter().map(message_bubble) }
                        </li>
                    }
                }
            })}
        </ul>
    }
}

fn message_bubble(message: &Message) -> Html {
    let class = classes!("chat-bubble", bubble_class(message.message_type));
    html! {
        <div
            key={message.id.clone()}
            class={class}
            data-type={message.message_type.as_str()}
            title={message.timestamp.0.to_rfc3339()}
        >
            { message.content.body.clone() }
        </div>
    }
}

fn bubble_class(message_type: MessageType) -> &'static str {
    match message_type {
        MessageType::Text => "chat-bubble-text",
        MessageType::Media => "chat-bubble-media",
        MessageType::Draftjs => "chat-bubble-rich",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubble_class_per_type() {
        assert_eq!(bubble_class(MessageType::Text), "chat-bubble-text");
        assert_eq!(bubble_class(MessageType::Media), "chat-bubble-media");
        assert_eq!(bubble_class(MessageType::Draftjs), "chat-bubble-rich");
    }
}
