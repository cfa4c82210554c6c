pub(crate) mod chat_messages;
pub(crate) mod loading;
pub(crate) mod messages_subscriber;

pub use messages_subscriber::MessagesSubscriber;
