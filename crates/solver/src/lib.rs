//! Study operations for quizrag.
//!
//! [`StudyEngine`] is the entry point: it owns a model gateway and a prompt
//! builder and exposes every operation as an independent async call.
//! - **RAG**: simulated retrieval followed by a structured answer
//! - **Verification**: a three-persona jury and vote consensus
//! - **Generators**: question batches, distractors, variants and topics
//!
//! The engine holds no mutable state. Clones share the same gateway and
//! prompts, so concurrent operations need no coordination.

pub mod evaluation;
pub mod generate;
pub mod rag;
pub mod verify;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use quizrag_core::{
    AgentConfig, AnswerRecord, AppConfig, AppResult, AutoTestConfig, Language, Question,
    VerificationResult,
};
use quizrag_llm::{GatewayConfig, ModelGateway};
use quizrag_prompt::PromptBuilder;

pub use generate::{rotation_topic, RawQuestion};
pub use rag::{RetrievalOutcome, SimulatedModel};

/// Facade over the study operations.
#[derive(Clone)]
pub struct StudyEngine {
    gateway: ModelGateway,
    prompts: Arc<PromptBuilder>,
}

impl StudyEngine {
    pub fn new(gateway: ModelGateway, prompts: PromptBuilder) -> Self {
        Self {
            gateway,
            prompts: Arc::new(prompts),
        }
    }

    /// Build the gateway and prompts described by the application config.
    ///
    /// Prompt overrides are read from the workspace's `.quizrag/prompts/`.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let gateway = ModelGateway::from_config(&GatewayConfig::from_app_config(config));
        let prompts = PromptBuilder::with_workspace(&config.workspace)?;

        tracing::debug!(
            provider = gateway.provider_name(),
            model = gateway.model(),
            "Study engine ready"
        );

        Ok(Self::new(gateway, prompts))
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Answer a question through simulated retrieval.
    pub async fn solve(
        &self,
        question: &Question,
        agent: Option<&AgentConfig>,
        language: Language,
    ) -> AppResult<AnswerRecord> {
        rag::solve(&self.gateway, &self.prompts, question, agent, language).await
    }

    /// Generate a batch of new questions.
    pub async fn generate_batch(&self, config: &AutoTestConfig) -> AppResult<Vec<Question>> {
        generate::generate_batch(&self.gateway, &self.prompts, config).await
    }

    /// Replace the wrong option at 1-based `option_index`.
    pub async fn regenerate_option(
        &self,
        question: &Question,
        option_index: u8,
        language: Language,
    ) -> AppResult<String> {
        generate::regenerate_option(&self.gateway, &self.prompts, question, option_index, language)
            .await
    }

    /// Generate rephrased variants of a question.
    pub async fn generate_variants(
        &self,
        question: &Question,
        count: usize,
        language: Language,
    ) -> AppResult<Vec<Question>> {
        generate::generate_variants(&self.gateway, &self.prompts, question, count, language).await
    }

    /// Have the expert jury vote on a question.
    pub async fn verify(
        &self,
        question: &Question,
        language: Language,
    ) -> AppResult<VerificationResult> {
        verify::verify(&self.gateway, &self.prompts, question, language).await
    }

    /// Extract course topics from the built-in study notes.
    pub async fn extract_topics(&self) -> AppResult<Vec<String>> {
        generate::extract_topics(&self.gateway, &self.prompts).await
    }

    /// Simulated retriever evaluation.
    pub fn evaluate_retriever(&self, question: &Question, expected_keywords: &[String]) -> String {
        evaluation::evaluate_retriever(question, expected_keywords)
    }
}
