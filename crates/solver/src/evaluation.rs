//! Retriever evaluation. Simulated: no model call is made.

use quizrag_core::Question;

/// Precision reported by the simulated evaluation.
pub const SIMULATED_PRECISION: f64 = 0.85;

/// Report how the retriever would fare on `question` for the expected keywords.
pub fn evaluate_retriever(question: &Question, expected_keywords: &[String]) -> String {
    tracing::debug!(question = %question.id, keywords = expected_keywords.len(), "Evaluating retriever");

    format!(
        "Simulated evaluation: the retriever found documents containing {}. Precision: {:.2}",
        expected_keywords.join(", "),
        SIMULATED_PRECISION
    )
}
