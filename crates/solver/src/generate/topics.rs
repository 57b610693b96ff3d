//! Topic extraction from the study notes.

use quizrag_core::catalog::STUDY_NOTES;
use quizrag_core::AppResult;
use quizrag_llm::{ModelGateway, SchemaId};
use quizrag_prompt::PromptBuilder;

/// Ask the model for the topic structure of the built-in notes.
///
/// Advisory only: repeated calls may return different lists.
pub async fn extract_topics(
    gateway: &ModelGateway,
    prompts: &PromptBuilder,
) -> AppResult<Vec<String>> {
    tracing::info!("Extracting topics from study notes");

    let prompt = prompts.topics(STUDY_NOTES)?;
    let topics: Vec<String> = gateway
        .generate_structured(prompt.as_str(), SchemaId::TopicList)
        .await?;

    tracing::info!(count = topics.len(), "Extracted topics");
    Ok(topics)
}
