use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};

use quizgen_core::config::{LlmConfig, OllamaConfig};
use quizgen_core::Question;
use quizgen_ingest::Segment;
use quizgen_llm::{create_provider, CompletionRequest, LlmError, LlmProvider, Message};

use crate::allocator::AllocationPlan;
use crate::parse::parse_questions;
use crate::prompt::build_messages;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),
    #[error("invalid AI response: {0}")]
    InvalidResponse(String),
    #[error("no valid questions generated")]
    NoValidQuestions,
}

impl GenerationError {
    /// A later attempt might succeed (rate limits, timeouts, 5xx).
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Llm(e) if e.is_transient())
    }
}

/// Everything needed to generate one segment's questions.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub segment: &'a Segment,
    pub plan: &'a AllocationPlan,
    pub topic: Option<&'a str>,
}

/// Produces questions for a single segment.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Vec<Question>, GenerationError>;
}

/// [`QuestionGenerator`] backed by a chat-completion provider.
pub struct LlmQuestionGenerator {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmQuestionGenerator {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    pub fn from_config(llm: &LlmConfig, ollama: &OllamaConfig) -> Result<Self, LlmError> {
        let provider = create_provider(llm, ollama)?;
        info!(
            provider = provider.name(),
            model = provider.model(),
            "LLM question generator ready"
        );
        Ok(Self::new(provider, llm.temperature, llm.max_tokens))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// True when the provider answers a trivial prompt with "hello".
    pub async fn test_connection(&self) -> bool {
        let request = CompletionRequest::new(
            vec![Message::user("Say 'Hello' if you can understand this message.")],
            0.0,
            10,
        );
        match self.provider.complete(request).await {
            Ok(text) => text.to_lowercase().contains("hello"),
            Err(e) => {
                error!(provider = self.provider.name(), error = %e, "LLM connection test failed");
                false
            }
        }
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Vec<Question>, GenerationError> {
        let messages = build_messages(&request.segment.text, request.plan, request.topic);
        debug!(
            segment = request.segment.index,
            questions = request.plan.questions_for_segment,
            provider = self.provider.name(),
            "Requesting questions"
        );

        let response = self
            .provider
            .complete(CompletionRequest::new(messages, self.temperature, self.max_tokens).json())
            .await?;

        parse_questions(&response, &request.plan.requested_types(), request.segment.index)
    }
}
