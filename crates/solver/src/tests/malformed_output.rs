//! Every structured operation rejects output that does not match its schema.

use quizrag_core::catalog::sample_questions;
use quizrag_core::{AppError, AutoTestConfig, Difficulty, Language, TopicSelector};
use quizrag_llm::MockReply;
use serde_json::json;

use super::engine;

fn assert_malformed<T: std::fmt::Debug>(result: Result<T, AppError>) {
    match result {
        Err(AppError::MalformedOutput(_)) => {}
        other => panic!("expected MalformedOutput, got {:?}", other),
    }
}

#[tokio::test]
async fn test_solve_rejects_out_of_range_answer() {
    let (engine, _) = engine(vec![
        MockReply::text("context"),
        MockReply::json(json!({ "predictedIndex": 7, "reasoning": "r", "confidence": 0.5 })),
    ]);
    assert_malformed(engine.solve(&sample_questions()[0], None, Language::En).await);
}

#[tokio::test]
async fn test_solve_rejects_prose() {
    let (engine, _) = engine(vec![
        MockReply::text("context"),
        MockReply::text("I think the answer is 1."),
    ]);
    assert_malformed(engine.solve(&sample_questions()[0], None, Language::En).await);
}

#[tokio::test]
async fn test_batch_rejects_three_options() {
    let (engine, _) = engine(vec![MockReply::json(json!([
        { "statement": "s", "options": ["a", "b", "c"], "correctIndex": 1 }
    ]))]);
    let config = AutoTestConfig {
        topic: TopicSelector::Global,
        count: 1,
        language: Language::En,
        difficulty: Difficulty::Basic,
    };
    assert_malformed(engine.generate_batch(&config).await);
}

#[tokio::test]
async fn test_variants_reject_missing_field() {
    let (engine, _) = engine(vec![MockReply::json(json!([
        { "statement": "s", "options": ["a", "b", "c", "d"] }
    ]))]);
    assert_malformed(
        engine
            .generate_variants(&sample_questions()[0], 1, Language::En)
            .await,
    );
}

#[tokio::test]
async fn test_verify_rejects_object_wrapper() {
    let (engine, _) = engine(vec![MockReply::json(json!({ "votes": [] }))]);
    assert_malformed(engine.verify(&sample_questions()[0], Language::En).await);
}

#[tokio::test]
async fn test_verify_rejects_float_vote() {
    let (engine, _) = engine(vec![MockReply::json(json!([
        { "agentName": "a", "role": "r", "voteIndex": 1.5, "shortReason": "x" }
    ]))]);
    assert_malformed(engine.verify(&sample_questions()[0], Language::En).await);
}

#[tokio::test]
async fn test_topics_reject_non_array() {
    let (engine, _) = engine(vec![MockReply::text("Topic 1: Permissions")]);
    assert_malformed(engine.extract_topics().await);
}
