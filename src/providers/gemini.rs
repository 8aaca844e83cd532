use reqwest::Client;
use serde_json::{json, Value};
use async_trait::async_trait;

use crate::providers::traits::{ChatMessage, ChatProvider, ProviderError, Role};

/// Gemini generateContent client used by the RAG variant.
///
/// Gemini does not take an in-band system message: the system turn maps to
/// `system_instruction` and assistant turns map to the `model` role. Output
/// is capped low because grounded answers are instructed to stay within a
/// few sentences.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        )
    }
}

fn build_request_body(messages: &[ChatMessage]) -> Value {
    let mut system_instruction = None;
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            Role::System => {
                system_instruction = Some(json!({
                    "parts": [{ "text": message.content }]
                }));
            }
            Role::User => contents.push(json!({
                "role": "user",
                "parts": [{ "text": message.content }]
            })),
            Role::Assistant => contents.push(json!({
                "role": "model",
                "parts": [{ "text": message.content }]
            })),
        }
    }

    let mut body = json!({
        "contents": contents,
        "generationConfig": {
            "temperature": 0.4,
            "maxOutputTokens": 500
        }
    });
    if let Some(instruction) = system_instruction {
        body["system_instruction"] = instruction;
    }
    body
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let response = self.client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&build_request_body(messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status: status.as_u16(), body });
        }

        let response_json: Value = response.json().await?;

        response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim_end().to_string())
            .ok_or_else(|| {
                let debug_json = serde_json::to_string_pretty(&response_json).unwrap_or_default();
                ProviderError::MalformedResponse(debug_json)
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
