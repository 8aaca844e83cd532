pub mod chat;
pub mod prompt;
pub mod retriever;

pub use chat::{Conversation, DirectChat, RagChat};
pub use retriever::Retriever;
