use quizrag_core::catalog::{sample_questions, STUDY_NOTES};
use quizrag_core::config::SimulatedProvider;
use quizrag_core::{AgentConfig, AppError, Language};
use quizrag_llm::{MockClient, MockReply, SchemaId};
use serde_json::json;

use super::engine;

fn answer(index: u8, confidence: f64) -> MockReply {
    MockReply::json(json!({
        "predictedIndex": index,
        "reasoning": "The notes say chmod u+x adds execute for the owner.",
        "confidence": confidence,
    }))
}

#[tokio::test]
async fn test_solve_two_phases() {
    let (engine, client) = engine(vec![
        MockReply::text("Notes: chmod u+x grants the owner execute permission."),
        answer(1, 0.93),
    ]);
    let questions = sample_questions();
    let question = &questions[0];

    let record = engine.solve(question, None, Language::En).await.unwrap();

    assert_eq!(record.question_id, question.id);
    assert_eq!(record.predicted_index, 1);
    assert!((1..=4).contains(&record.predicted_index));
    assert!((0.0..=1.0).contains(&record.confidence));
    assert!(record
        .reasoning
        .starts_with("[Model: Gemini (Default)] The notes say"));
    assert!(record.is_correct_for(question));

    assert_eq!(record.retrieved_context.len(), 1);
    let doc = &record.retrieved_context[0];
    assert_eq!(doc.source, "study_notes_en.pdf");
    assert_eq!(doc.relevance_score, 0.92);
    assert_eq!(doc.content, "Notes: chmod u+x grants the owner execute permission....");

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].is_structured());
    assert_eq!(requests[1].response_schema, Some(SchemaId::Answer.schema()));
    // The retrieved passage feeds the answer prompt
    assert!(requests[1]
        .prompt
        .contains("chmod u+x grants the owner execute permission"));
}

#[tokio::test]
async fn test_solve_falls_back_to_study_notes() {
    let (engine, client) = engine(vec![MockReply::Empty, answer(1, 0.6)]);

    let record = engine
        .solve(&sample_questions()[0], None, Language::Es)
        .await
        .unwrap();

    assert_eq!(record.retrieved_context[0].source, "study_notes_es.pdf");
    assert!(record.retrieved_context[0].content.ends_with("..."));
    let prompts = client.prompts();
    assert!(prompts[1].contains("## The chmod command"));
    assert!(STUDY_NOTES.chars().count() > 300);
}

#[tokio::test]
async fn test_solve_retrieval_error_is_not_fatal() {
    let (engine, _) = engine(vec![
        MockReply::ProviderError("connection reset".to_string()),
        answer(2, 0.4),
    ]);
    let record = engine
        .solve(&sample_questions()[1], None, Language::Eu)
        .await
        .unwrap();
    assert_eq!(record.predicted_index, 2);
}

#[tokio::test]
async fn test_solve_uses_agent_labels() {
    let (engine, client) = engine(vec![MockReply::text("ctx"), answer(3, 0.8)]);
    let agent = AgentConfig {
        provider: SimulatedProvider::External,
        external_model: Some("claude-sonnet".to_string()),
        temperature: 0.2,
        ..AgentConfig::default()
    };

    let record = engine
        .solve(&sample_questions()[2], Some(&agent), Language::En)
        .await
        .unwrap();

    assert!(record.reasoning.starts_with("[Model: claude-sonnet] "));
    let prompt = &client.prompts()[1];
    assert!(prompt.contains("(External API simulation: claude-sonnet)"));
    assert!(prompt.contains("Temperature: 0.2"));
}

#[tokio::test]
async fn test_answer_phase_errors_propagate() {
    let (no_key, _) = engine(vec![
        MockReply::text("ctx"),
        MockReply::MissingCredential,
    ]);
    let result = no_key.solve(&sample_questions()[0], None, Language::En).await;
    assert!(matches!(result, Err(AppError::MissingCredential(_))));

    let (silent, _) = engine(vec![MockReply::text("ctx"), MockReply::Empty]);
    let result = silent.solve(&sample_questions()[0], None, Language::En).await;
    assert!(matches!(result, Err(AppError::EmptyResponse(_))));
}

#[tokio::test]
async fn test_concurrent_solves_share_engine() {
    // The fallback serves both phases; the JSON text doubles as retrieved context
    let (engine, client) =
        super::engine_with(MockClient::new().with_fallback(answer(1, 0.9)));
    let questions = sample_questions();

    let results = futures::future::join_all(
        questions
            .iter()
            .map(|q| engine.solve(q, None, Language::En)),
    )
    .await;

    assert!(results.iter().all(|r| r.is_ok()));
    // Three questions, two calls each
    assert_eq!(client.call_count(), 6);
}
