//! Distractor regeneration.

use quizrag_core::question::is_valid_option_index;
use quizrag_core::{AppError, AppResult, Language, Question};
use quizrag_llm::ModelGateway;
use quizrag_prompt::PromptBuilder;

/// Generate a replacement for the wrong option at 1-based `option_index`.
///
/// The prompt tells the model to differ from the correct answer and the
/// sibling options. If the reply still matches one of them (ignoring case and
/// surrounding whitespace) the call is repeated once, and the second reply is
/// returned whatever it is.
pub async fn regenerate_option(
    gateway: &ModelGateway,
    prompts: &PromptBuilder,
    question: &Question,
    option_index: u8,
    language: Language,
) -> AppResult<String> {
    if !is_valid_option_index(option_index) {
        return Err(AppError::InvalidInput(format!(
            "Option index {} is outside 1-4",
            option_index
        )));
    }
    if question.correct_option == Some(option_index) {
        return Err(AppError::InvalidInput(format!(
            "Option {} is the correct answer of {}; only wrong options can be regenerated",
            option_index, question.id
        )));
    }

    tracing::info!(question = %question.id, option = option_index, "Regenerating distractor");

    let prompt = prompts.distractor(question, option_index, language)?;
    let first = gateway.generate_text(prompt.as_str()).await?;

    if !collides(question, option_index, &first) {
        return Ok(first);
    }

    tracing::warn!(
        question = %question.id,
        option = option_index,
        "Generated distractor repeats an existing option, retrying once"
    );

    let second = gateway.generate_text(prompt.as_str()).await?;
    if collides(question, option_index, &second) {
        tracing::warn!(
            question = %question.id,
            option = option_index,
            "Retried distractor still repeats an existing option"
        );
    }
    Ok(second)
}

/// Whether `candidate` equals the correct option or a sibling option.
fn collides(question: &Question, option_index: u8, candidate: &str) -> bool {
    let candidate = normalize(candidate);
    question
        .options
        .iter()
        .enumerate()
        .filter(|(i, _)| *i + 1 != option_index as usize)
        .any(|(_, option)| normalize(option) == candidate)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
