//! LLM client abstraction and request/response types.
//!
//! A client performs exactly one network call per request and hands back the
//! raw text. Interpreting that text (emptiness, JSON, schema) is the
//! gateway's job.

use quizrag_core::AppResult;
use serde::{Deserialize, Serialize};

use crate::schema::ResponseSchema;

/// LLM completion request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The prompt text to send to the LLM
    pub prompt: String,

    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Requested response shape; `None` for free-text calls
    pub response_schema: Option<ResponseSchema>,
}

impl LlmRequest {
    /// Create a free-text request.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            response_schema: None,
        }
    }

    /// Ask for JSON output matching `schema`.
    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn is_structured(&self) -> bool {
        self.response_schema.is_some()
    }
}

/// LLM completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text, if the provider returned any
    pub content: Option<String>,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    #[serde(default)]
    pub usage: LlmUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations must report a missing credential as
/// `AppError::MissingCredential` before touching the network, and transport
/// or status failures as `AppError::Provider`.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "gemini", "mock").
    fn provider_name(&self) -> &str;

    /// Perform a single completion call.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}
