use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::post_json;
use crate::provider::{CompletionRequest, LlmError, LlmProvider};

const OPENAI_API_BASE: &str = "https://api.openai.com";

/// OpenAI chat completions, or any server speaking the same protocol
/// (set `OPENAI_BASE_URL`).
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: OPENAI_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    // JSON mode (`response_format: json_object`) forbids top-level arrays,
    // so `json_output` is left to the prompt here.
    fn build_request_body(model: &str, request: &CompletionRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        json!({
            "model": model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }

    fn extract_text(resp: &Value) -> Result<String, LlmError> {
        let choice = &resp["choices"][0];
        match choice["message"]["content"].as_str() {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => {
                let reason = choice["finish_reason"].as_str().unwrap_or("no choices");
                Err(LlmError::ParseError(format!(
                    "missing choices[0].message.content ({reason})"
                )))
            }
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let url = self.endpoint();
        let body = Self::build_request_body(&self.model, &request);
        debug!(model = %self.model, url = %url, "OpenAI request");

        let post = self.client.post(&url).bearer_auth(&self.api_key);
        let resp = post_json(post, &body).await?;
        Self::extract_text(&resp)
    }
}
