//! Two-phase RAG answering.
//!
//! This function:
//! 1. Simulates retrieval (falling back to the built-in notes)
//! 2. Asks for a structured answer grounded in that context
//! 3. Stamps the reasoning with the simulated model and keeps a truncated
//!    copy of the context as the retrieved document

use quizrag_core::config::SimulatedProvider;
use quizrag_core::{
    AgentConfig, AnswerRecord, AppResult, Language, Question, RetrievedDocument,
};
use quizrag_llm::{ModelGateway, SchemaId};
use quizrag_prompt::{AnswerPromptInput, PromptBuilder};
use serde::Deserialize;

use super::retrieve::retrieve_context;

/// Maximum number of characters of context kept in the answer record.
pub const CONTEXT_PREVIEW_CHARS: usize = 300;

/// Relevance attached to the simulated retrieved document.
pub const SIMULATED_RELEVANCE: f64 = 0.92;

/// Temperature label used when no agent configuration is given.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The model the answer prompt asks the generator to impersonate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedModel {
    pub name: String,
    pub provider_info: String,
}

impl SimulatedModel {
    /// Pick the label from the agent settings.
    ///
    /// External provider with an external model wins; otherwise the selected
    /// local model; with neither, the default Gemini label.
    pub fn from_agent(agent: Option<&AgentConfig>) -> Self {
        let external = agent
            .filter(|a| a.provider == SimulatedProvider::External)
            .and_then(|a| a.external_model.as_deref())
            .filter(|model| !model.is_empty());

        if let Some(model) = external {
            return Self {
                name: model.to_string(),
                provider_info: format!("(External API simulation: {})", model),
            };
        }

        match agent.map(|a| a.selected_model.as_str()).filter(|m| !m.is_empty()) {
            Some(model) => Self {
                name: model.to_string(),
                provider_info: "(Local Ollama simulation)".to_string(),
            },
            None => Self {
                name: "Gemini (Default)".to_string(),
                provider_info: "(RAG simulation)".to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerPayload {
    predicted_index: u8,
    reasoning: String,
    confidence: f64,
}

/// Answer one question.
///
/// Retrieval failures degrade to the built-in notes; answer-phase failures
/// are returned as-is.
pub async fn solve(
    gateway: &ModelGateway,
    prompts: &PromptBuilder,
    question: &Question,
    agent: Option<&AgentConfig>,
    language: Language,
) -> AppResult<AnswerRecord> {
    tracing::info!(question = %question.id, language = %language, "Solving question");

    let retrieval = retrieve_context(gateway, prompts, question, language).await?;
    let context = retrieval.text();

    let model = SimulatedModel::from_agent(agent);
    let temperature = agent.map(|a| a.temperature).unwrap_or(DEFAULT_TEMPERATURE);

    let prompt = prompts.answer(&AnswerPromptInput {
        question,
        context,
        model_name: &model.name,
        provider_info: &model.provider_info,
        temperature,
        language,
    })?;

    let payload: AnswerPayload = gateway
        .generate_structured(prompt.as_str(), SchemaId::Answer)
        .await?;

    tracing::info!(
        question = %question.id,
        predicted = payload.predicted_index,
        confidence = payload.confidence,
        fallback_context = retrieval.is_fallback(),
        "Answer generated"
    );

    Ok(AnswerRecord {
        question_id: question.id.clone(),
        predicted_index: payload.predicted_index,
        reasoning: format!("[Model: {}] {}", model.name, payload.reasoning),
        confidence: payload.confidence,
        retrieved_context: vec![RetrievedDocument {
            source: format!("study_notes_{}.pdf", language.code()),
            content: preview(context),
            relevance_score: SIMULATED_RELEVANCE,
        }],
    })
}

/// First [`CONTEXT_PREVIEW_CHARS`] characters followed by "...".
fn preview(context: &str) -> String {
    let end = context
        .char_indices()
        .nth(CONTEXT_PREVIEW_CHARS)
        .map(|(cut, _)| cut)
        .unwrap_or(context.len());
    format!("{}...", &context[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_model_labels() {
        assert_eq!(
            SimulatedModel::from_agent(None),
            SimulatedModel {
                name: "Gemini (Default)".to_string(),
                provider_info: "(RAG simulation)".to_string(),
            }
        );

        let local = AgentConfig::default();
        let model = SimulatedModel::from_agent(Some(&local));
        assert_eq!(model.name, "llama3");
        assert_eq!(model.provider_info, "(Local Ollama simulation)");

        let external = AgentConfig {
            provider: SimulatedProvider::External,
            external_model: Some("gpt-4o".to_string()),
            ..AgentConfig::default()
        };
        let model = SimulatedModel::from_agent(Some(&external));
        assert_eq!(model.name, "gpt-4o");
        assert!(model.provider_info.contains("External API simulation"));
    }

    #[test]
    fn test_external_without_model_uses_local_label() {
        let agent = AgentConfig {
            provider: SimulatedProvider::External,
            external_model: None,
            selected_model: "mistral".to_string(),
            ..AgentConfig::default()
        };
        assert_eq!(SimulatedModel::from_agent(Some(&agent)).name, "mistral");
    }

    #[test]
    fn test_preview_always_appends_ellipsis() {
        assert_eq!(preview("chmod changes modes"), "chmod changes modes...");
        assert_eq!(preview(""), "...");

        let exact: String = "a".repeat(CONTEXT_PREVIEW_CHARS);
        assert_eq!(preview(&exact), format!("{}...", exact));

        let long: String = "ñ".repeat(CONTEXT_PREVIEW_CHARS + 10);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), CONTEXT_PREVIEW_CHARS + 3);
    }
}
