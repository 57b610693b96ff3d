use quizrag_core::catalog::sample_questions;
use quizrag_core::Language;
use quizrag_llm::{MockReply, SchemaId};
use serde_json::json;

use super::engine;

fn jury(indices: [u8; 3]) -> MockReply {
    MockReply::json(json!([
        { "agentName": "Senior SysAdmin", "role": "sysadmin", "voteIndex": indices[0], "shortReason": "Works in production." },
        { "agentName": "Theory Professor", "role": "academic", "voteIndex": indices[1], "shortReason": "Matches the man page." },
        { "agentName": "Security Auditor", "role": "security", "voteIndex": indices[2], "shortReason": "Least privilege." },
    ]))
}

#[tokio::test]
async fn test_unanimous_jury() {
    let (engine, client) = engine(vec![jury([2, 2, 2])]);
    let result = engine
        .verify(&sample_questions()[1], Language::En)
        .await
        .unwrap();

    assert_eq!(result.votes.len(), 3);
    assert_eq!(result.consensus_index, Some(2));
    assert_eq!(result.agreement_percentage, 100.0);
    assert!(!result.has_tie);
    assert_eq!(result.votes[1].agent_name, "Theory Professor");

    // One call with the jury schema
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].response_schema, Some(SchemaId::JuryVotes.schema()));
}

#[tokio::test]
async fn test_majority_jury() {
    let (engine, _) = engine(vec![jury([1, 2, 2])]);
    let result = engine
        .verify(&sample_questions()[1], Language::Eu)
        .await
        .unwrap();

    assert_eq!(result.consensus_index, Some(2));
    assert!((result.agreement_percentage - 66.67).abs() < 0.01);
    assert_eq!(result.vote_summary(), "[1 2 2]");
}

#[tokio::test]
async fn test_split_jury_flags_tie() {
    let (engine, _) = engine(vec![jury([4, 2, 3])]);
    let result = engine
        .verify(&sample_questions()[0], Language::Es)
        .await
        .unwrap();

    assert_eq!(result.consensus_index, Some(2));
    assert!(result.has_tie);
}

#[tokio::test]
async fn test_empty_jury() {
    let (engine, _) = engine(vec![MockReply::json(json!([]))]);
    let result = engine
        .verify(&sample_questions()[0], Language::En)
        .await
        .unwrap();

    assert!(result.votes.is_empty());
    assert_eq!(result.consensus_index, None);
    assert_eq!(result.agreement_percentage, 0.0);
}
