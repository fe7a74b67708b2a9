pub mod gemini;
pub mod ollama;
pub mod openai;

use quizgen_core::config::{LlmConfig, OllamaConfig};
use tracing::debug;

use crate::provider::{LlmError, LlmProvider};

/// Create the provider named by `LLM_PROVIDER`.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match llm_config.provider.to_lowercase().as_str() {
        "gemini" | "google" => {
            let api_key = llm_config
                .gemini_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GOOGLE_GEMINI_API_KEY not set".into()))?;
            Ok(Box::new(gemini::GeminiProvider::new(
                api_key.clone(),
                llm_config.gemini_model.clone(),
            )))
        }
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let provider = openai::OpenAiProvider::new(api_key.clone(), llm_config.openai_model.clone());
            Ok(Box::new(match &llm_config.openai_base_url {
                Some(base) => provider.with_base_url(base.clone()),
                None => provider,
            }))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}' (expected gemini, openai or ollama)",
            other
        ))),
    }
}

/// POST a JSON body and decode the JSON reply. Non-2xx statuses become
/// [`LlmError::ApiError`] carrying the response body.
pub(crate) async fn post_json(
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
) -> Result<serde_json::Value, LlmError> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "LLM API returned an error status");
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}
