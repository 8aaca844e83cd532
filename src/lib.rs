pub mod config;
pub mod database;
pub mod document;
pub mod embeddings;
pub mod ingest;
pub mod llm;
pub mod providers;

// Re-export commonly used items
pub use config::Config;
pub use document::{Chunk, Document, TextSplitter};
pub use llm::{Conversation, DirectChat, RagChat, Retriever};
