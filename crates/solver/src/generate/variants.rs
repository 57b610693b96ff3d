//! Question variants: same concept, different wording.

use chrono::{DateTime, Utc};
use quizrag_core::{AppError, AppResult, Language, Question};
use quizrag_llm::{ModelGateway, SchemaId};
use quizrag_prompt::PromptBuilder;

use super::ids::variant_id;
use super::RawQuestion;

/// Generate `count` variants of `question`.
pub async fn generate_variants(
    gateway: &ModelGateway,
    prompts: &PromptBuilder,
    question: &Question,
    count: usize,
    language: Language,
) -> AppResult<Vec<Question>> {
    if count == 0 {
        return Err(AppError::InvalidInput(
            "Variant count must be at least 1".to_string(),
        ));
    }

    tracing::info!(question = %question.id, count, "Generating question variants");

    let prompt = prompts.variants(question, count, language)?;
    let raw: Vec<RawQuestion> = gateway
        .generate_structured(prompt.as_str(), SchemaId::QuestionBatch)
        .await?;

    if raw.len() != count {
        tracing::warn!(requested = count, received = raw.len(), "Variant count differs from request");
    }

    Ok(enrich_variants(raw, question, Utc::now()))
}

/// Stamp variants with fresh ids and the source's topic and difficulty.
pub fn enrich_variants(
    raw: Vec<RawQuestion>,
    source: &Question,
    now: DateTime<Utc>,
) -> Vec<Question> {
    raw.into_iter()
        .enumerate()
        .map(|(index, item)| Question {
            id: variant_id(now, index),
            topic: source.topic.clone(),
            statement: item.statement,
            options: item.options,
            correct_option: Some(item.correct_index),
            difficulty: source.difficulty,
        })
        .collect()
}
