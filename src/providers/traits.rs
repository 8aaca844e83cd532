use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation in the shape chat-completion APIs expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    /// The endpoint answered with a non-success status. Status and body are
    /// kept verbatim so the chat layer can render them in place of an
    /// answer.
    #[error("Error: {status} - {body}")]
    Api { status: u16, body: String },
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),
}

/// Produces a natural-language answer for an assembled message list.
///
/// Implementations make exactly one upstream call per invocation: no retry,
/// no backoff. Failures surface to the orchestrator, which decides how to
/// render them.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;

    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let message = ChatMessage::assistant("Take two and call me in the morning.");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Take two and call me in the morning.");
    }

    #[test]
    fn api_errors_render_status_and_body() {
        let error = ProviderError::Api { status: 500, body: "internal error".to_string() };
        assert_eq!(error.to_string(), "Error: 500 - internal error");
    }
}
