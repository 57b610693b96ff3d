//! Expert jury verification: one call, three simulated personas.

use quizrag_core::{AgentVote, AppResult, Language, Question, VerificationResult};
use quizrag_llm::{ModelGateway, SchemaId};
use quizrag_prompt::PromptBuilder;

use super::consensus::aggregate;

/// Ask the jury to vote on the question and aggregate the votes.
pub async fn verify(
    gateway: &ModelGateway,
    prompts: &PromptBuilder,
    question: &Question,
    language: Language,
) -> AppResult<VerificationResult> {
    tracing::info!(question = %question.id, "Verifying question with expert jury");

    let prompt = prompts.jury(question, language)?;
    let votes: Vec<AgentVote> = gateway
        .generate_structured(prompt.as_str(), SchemaId::JuryVotes)
        .await?;

    if votes.len() != 3 {
        tracing::warn!(count = votes.len(), "Jury returned an unexpected number of votes");
    }

    let result = aggregate(votes);

    tracing::info!(
        question = %question.id,
        consensus = ?result.consensus_index,
        agreement = result.agreement_percentage,
        tie = result.has_tie,
        "Jury verdict"
    );

    Ok(result)
}
