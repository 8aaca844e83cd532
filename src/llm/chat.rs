use std::sync::Arc;

use crate::llm::prompt::{build_rag_messages, GREETING, MEDICAL_ONLY_PROMPT};
use crate::llm::retriever::Retriever;
use crate::providers::traits::{ChatMessage, ChatProvider, ProviderError, Role};

/// Ordered turn history owned by one chat session.
///
/// The system turn, when present, is fixed at construction and excluded
/// from display. Turns only ever grow by a (user, assistant) pair per
/// interaction.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(instruction: impl Into<String>) -> Self {
        Self { messages: vec![ChatMessage::system(instruction)] }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Full history including the system turn, for providers that consume
    /// the whole conversation.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Turns suitable for display: everything but the system instruction.
    pub fn visible(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    pub fn last_answer(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

/// How a failed round trip shows up in the conversation: API failures keep
/// the upstream status and body verbatim, everything else is stringified.
/// Either way the session continues.
fn render_error(error: &ProviderError) -> String {
    match error {
        ProviderError::Api { status, body } => format!("Error: {} - {}", status, body),
        other => format!("Error: {}", other),
    }
}

/// Retrieval-grounded orchestrator: retrieve, assemble, generate, append.
///
/// One request is in flight at a time; the await below is the whole
/// "awaiting answer" state, and the caller's input loop blocks on it.
pub struct RagChat {
    retriever: Retriever,
    provider: Arc<dyn ChatProvider>,
    conversation: Conversation,
}

impl RagChat {
    pub fn new(retriever: Retriever, provider: Arc<dyn ChatProvider>) -> Self {
        let mut conversation = Conversation::new();
        conversation.push_assistant(GREETING);
        Self { retriever, provider, conversation }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Run one full interaction. The returned string is exactly what was
    /// appended as the assistant turn, error renderings included.
    pub async fn ask(&mut self, question: &str) -> String {
        self.conversation.push_user(question);
        let answer = match self.answer(question).await {
            Ok(answer) => answer,
            Err(error) => error,
        };
        self.conversation.push_assistant(answer.clone());
        answer
    }

    async fn answer(&self, question: &str) -> Result<String, String> {
        let chunks = self.retriever
            .retrieve(question)
            .await
            .map_err(|e| format!("Error: {:#}", e))?;

        let messages = build_rag_messages(&chunks, question);

        self.provider
            .chat(&messages)
            .await
            .map_err(|e| render_error(&e))
    }
}

/// Non-retrieval orchestrator: the full turn history plus the static
/// medical-only instruction goes straight to the provider. Refusing
/// off-topic questions is left entirely to the instruction wording.
pub struct DirectChat {
    provider: Arc<dyn ChatProvider>,
    conversation: Conversation,
}

impl DirectChat {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        let mut conversation = Conversation::with_system(MEDICAL_ONLY_PROMPT);
        conversation.push_assistant(GREETING);
        Self { provider, conversation }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub async fn ask(&mut self, question: &str) -> String {
        self.conversation.push_user(question);
        let answer = match self.provider.chat(self.conversation.messages()).await {
            Ok(answer) => answer,
            Err(error) => render_error(&error),
        };
        self.conversation.push_assistant(answer.clone());
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedProvider {
        reply: Result<String, (u16, String)>,
    }

    #[async_trait]
    impl ChatProvider for CannedProvider {
        async fn chat(&self, _messages: &[ChatMessage]) -> Result<String, ProviderError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, body)) => Err(ProviderError::Api {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn direct_variant_appends_user_then_assistant() {
        let provider = Arc::new(CannedProvider {
            reply: Ok("Sorry, I can only assist with medical-related questions.".to_string()),
        });
        let mut chat = DirectChat::new(provider);

        let answer = chat.ask("What's the capital of France?").await;

        assert_eq!(answer, "Sorry, I can only assist with medical-related questions.");
        let turns: Vec<_> = chat.conversation().visible().collect();
        // greeting, user, assistant
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].role, Role::User);
        assert_eq!(turns[2].content, "Sorry, I can only assist with medical-related questions.");
    }

    #[tokio::test]
    async fn upstream_failure_is_rendered_as_the_assistant_turn() {
        let provider = Arc::new(CannedProvider {
            reply: Err((500, "upstream exploded".to_string())),
        });
        let mut chat = DirectChat::new(provider);

        let answer = chat.ask("What is a fever?").await;

        assert_eq!(answer, "Error: 500 - upstream exploded");
        assert_eq!(chat.conversation().last_answer(), Some("Error: 500 - upstream exploded"));

        // The session survives a failed round trip.
        let answer = chat.ask("Still there?").await;
        assert_eq!(answer, "Error: 500 - upstream exploded");
        assert_eq!(chat.conversation().visible().count(), 5);
    }

    #[tokio::test]
    async fn direct_variant_sends_the_full_history() {
        struct CountingProvider;

        #[async_trait]
        impl ChatProvider for CountingProvider {
            async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
                Ok(format!("saw {} messages", messages.len()))
            }

            fn model(&self) -> &str {
                "counting"
            }
        }

        let mut chat = DirectChat::new(Arc::new(CountingProvider));
        // system + greeting + question
        assert_eq!(chat.ask("first").await, "saw 3 messages");
        assert_eq!(chat.ask("second").await, "saw 5 messages");
    }

    #[test]
    fn system_turn_is_hidden_from_display() {
        let conversation = Conversation::with_system(MEDICAL_ONLY_PROMPT);
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.visible().count(), 0);
    }
}
