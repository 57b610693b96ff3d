//! Scripted LLM client for tests and offline development.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use quizrag_core::{AppError, AppResult};

/// One scripted outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Succeed without any text
    Empty,
    /// Fail as a transport/status error
    ProviderError(String),
    /// Fail as if no credential were configured
    MissingCredential,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Serialize a JSON value as the reply text.
    pub fn json(value: serde_json::Value) -> Self {
        Self::Text(value.to_string())
    }
}

/// Mock client that replays scripted replies in order and records every
/// request it receives.
///
/// When the script runs out, the fallback reply is used; without a fallback
/// the call fails with a provider error.
#[derive(Debug, Default)]
pub struct MockClient {
    script: Mutex<VecDeque<MockReply>>,
    fallback: Option<MockReply>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client that replays `replies` in order.
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Reply used once the script is exhausted.
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    /// Append a reply to the script.
    pub fn push(&self, reply: MockReply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn next_reply(&self) -> Option<MockReply> {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .or_else(|| self.fallback.clone())
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let content = match self.next_reply() {
            Some(MockReply::Text(text)) => Some(text),
            Some(MockReply::Empty) => None,
            Some(MockReply::ProviderError(message)) => return Err(AppError::Provider(message)),
            Some(MockReply::MissingCredential) => {
                return Err(AppError::MissingCredential(
                    "mock client has no credential".to_string(),
                ))
            }
            None => {
                return Err(AppError::Provider(
                    "mock script exhausted".to_string(),
                ))
            }
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let client = MockClient::scripted([MockReply::text("first"), MockReply::Empty]);

        let first = client.complete(&LlmRequest::new("a", "m")).await.unwrap();
        assert_eq!(first.content.as_deref(), Some("first"));

        let second = client.complete(&LlmRequest::new("b", "m")).await.unwrap();
        assert_eq!(second.content, None);

        assert!(client.complete(&LlmRequest::new("c", "m")).await.is_err());
        assert_eq!(client.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_fallback_repeats() {
        let client = MockClient::new().with_fallback(MockReply::text("always"));
        for _ in 0..3 {
            let response = client.complete(&LlmRequest::new("q", "m")).await.unwrap();
            assert_eq!(response.content.as_deref(), Some("always"));
        }
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_scripted_errors() {
        let client = MockClient::scripted([
            MockReply::ProviderError("503".to_string()),
            MockReply::MissingCredential,
        ]);
        let request = LlmRequest::new("q", "m");
        assert!(matches!(client.complete(&request).await, Err(AppError::Provider(_))));
        assert!(matches!(
            client.complete(&request).await,
            Err(AppError::MissingCredential(_))
        ));
    }
}
