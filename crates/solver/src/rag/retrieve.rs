//! Retrieve phase: a model-simulated stand-in for document search.

use quizrag_core::catalog::STUDY_NOTES;
use quizrag_core::{AppResult, Language, Question};
use quizrag_llm::ModelGateway;
use quizrag_prompt::PromptBuilder;

/// Where the answer-phase context came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    /// Passage generated by the model
    Retrieved(String),
    /// Built-in study notes, used when the model produced nothing
    Fallback(&'static str),
}

impl RetrievalOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Retrieved(text) => text,
            Self::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Ask the model for a passage that would contain the answer.
///
/// Any gateway failure, empty output included, degrades to
/// [`RetrievalOutcome::Fallback`]. Only a prompt error is returned.
pub async fn retrieve_context(
    gateway: &ModelGateway,
    prompts: &PromptBuilder,
    question: &Question,
    language: Language,
) -> AppResult<RetrievalOutcome> {
    let prompt = prompts.retrieval(question, language)?;

    match gateway.generate_text(prompt.as_str()).await {
        Ok(text) => {
            tracing::debug!(question = %question.id, chars = text.len(), "Retrieved context");
            Ok(RetrievalOutcome::Retrieved(text))
        }
        Err(e) => {
            tracing::warn!(
                question = %question.id,
                error = %e,
                "Retrieval failed, falling back to built-in study notes"
            );
            Ok(RetrievalOutcome::Fallback(STUDY_NOTES))
        }
    }
}
