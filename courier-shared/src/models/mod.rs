pub mod connection;
pub mod errors;
pub mod message;
pub mod thread;
pub mod timestamp;

pub use connection::{MessageConnection, MessageEdge, PageInfo};
pub use errors::{ErrorResponse, ThreadError, ThreadResult};
pub use message::{Author, Message, MessageContent, MessageType};
pub use thread::{CurrentUser, DirectMessageThread, Participant};
pub use timestamp::Timestamp;
