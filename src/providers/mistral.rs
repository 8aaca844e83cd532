use reqwest::Client;
use serde_json::{json, Value};
use async_trait::async_trait;

use crate::providers::traits::{ChatMessage, ChatProvider, ProviderError};

const MISTRAL_URL: &str = "https://api.mistral.ai/v1/chat/completions";

/// Mistral chat-completions client used by the direct (non-retrieval)
/// variant. Sampling is deliberately loose and the token cap generous,
/// since answers here are not grounded in retrieved context.
#[derive(Clone)]
pub struct MistralProvider {
    api_key: String,
    client: Client,
    model: String,
}

impl MistralProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
            model,
        }
    }
}

#[async_trait]
impl ChatProvider for MistralProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let response = self.client
            .post(MISTRAL_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "temperature": 0.9,
                "max_tokens": 1500
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status: status.as_u16(), body });
        }

        let response_json: Value = response.json().await?;

        response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                let debug_json = serde_json::to_string_pretty(&response_json).unwrap_or_default();
                ProviderError::MalformedResponse(debug_json)
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
