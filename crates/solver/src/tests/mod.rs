//! Operation-level tests driving `StudyEngine` through the scripted client.

mod malformed_output;
mod solve_flow;
mod verification;

use std::sync::Arc;

use quizrag_llm::{MockClient, MockReply, ModelGateway};
use quizrag_prompt::PromptBuilder;

use crate::StudyEngine;

/// Engine over a mock client replaying `replies`.
fn engine(replies: Vec<MockReply>) -> (StudyEngine, Arc<MockClient>) {
    engine_with(MockClient::scripted(replies))
}

fn engine_with(client: MockClient) -> (StudyEngine, Arc<MockClient>) {
    let client = Arc::new(client);
    let gateway = ModelGateway::new(client.clone(), "gemini-2.5-flash");
    let prompts = PromptBuilder::new().expect("built-in prompts");
    (StudyEngine::new(gateway, prompts), client)
}
