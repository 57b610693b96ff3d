//! The model gateway: the single path from a rendered prompt to a model reply.
//!
//! Every call is one attempt with no retry. Failures are reported through the
//! gateway taxonomy of [`AppError`]:
//! - `MissingCredential` (from the client, before any network activity)
//! - `Provider` (transport or non-success status)
//! - `EmptyResponse` (no text came back)
//! - `MalformedOutput` (text is not JSON or does not match the schema)

use std::sync::Arc;

use quizrag_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{LlmClient, LlmRequest};
use crate::factory::create_client;
use crate::schema::SchemaId;
use crate::types::GatewayConfig;

/// Injectable gateway over an [`LlmClient`].
#[derive(Clone)]
pub struct ModelGateway {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl ModelGateway {
    /// Wrap an existing client.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build the configured provider client.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(create_client(config), config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Free-text generation.
    ///
    /// Returns the trimmed text; blank output is `EmptyResponse`.
    pub async fn generate_text(&self, prompt: &str) -> AppResult<String> {
        let request = LlmRequest::new(prompt, self.model.as_str());
        self.complete_text(&request).await
    }

    /// Structured generation validated against a registry schema.
    pub async fn generate_json(&self, prompt: &str, schema_id: SchemaId) -> AppResult<Value> {
        let schema = schema_id.schema();
        let request = LlmRequest::new(prompt, self.model.as_str()).with_schema(schema.clone());
        let text = self.complete_text(&request).await?;

        let value: Value = serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
            AppError::MalformedOutput(format!(
                "{} response is not valid JSON: {}",
                schema_id.name(),
                e
            ))
        })?;

        schema.validate(&value).map_err(|e| match e {
            AppError::MalformedOutput(reason) => {
                AppError::MalformedOutput(format!("{} response {}", schema_id.name(), reason))
            }
            other => other,
        })?;

        Ok(value)
    }

    /// Structured generation deserialized into `T`.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema_id: SchemaId,
    ) -> AppResult<T> {
        let value = self.generate_json(prompt, schema_id).await?;
        serde_json::from_value(value).map_err(|e| {
            AppError::MalformedOutput(format!(
                "{} response has an unexpected shape: {}",
                schema_id.name(),
                e
            ))
        })
    }

    async fn complete_text(&self, request: &LlmRequest) -> AppResult<String> {
        let response = self.client.complete(request).await?;

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Err(AppError::EmptyResponse(format!(
                "{} returned no text for model {}",
                self.client.provider_name(),
                request.model
            ))),
        }
    }
}

/// Drop a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockClient, MockReply};
    use serde::Deserialize;
    use serde_json::json;

    fn gateway(replies: Vec<MockReply>) -> (ModelGateway, Arc<MockClient>) {
        let client = Arc::new(MockClient::scripted(replies));
        (ModelGateway::new(client.clone(), "gemini-2.5-flash"), client)
    }

    #[tokio::test]
    async fn test_generate_text_trims() {
        let (gateway, client) = gateway(vec![MockReply::text("  chmod u+x  \n")]);
        assert_eq!(gateway.generate_text("prompt").await.unwrap(), "chmod u+x");

        let requests = client.requests();
        assert_eq!(requests[0].model, "gemini-2.5-flash");
        assert!(!requests[0].is_structured());
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_response() {
        let (gateway, _) = gateway(vec![MockReply::Empty, MockReply::text("   ")]);
        assert!(matches!(
            gateway.generate_text("p").await,
            Err(AppError::EmptyResponse(_))
        ));
        assert!(matches!(
            gateway.generate_json("p", SchemaId::TopicList).await,
            Err(AppError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_json_sends_schema_and_validates() {
        let (gateway, client) = gateway(vec![MockReply::json(json!(["Topic 1: Intro"]))]);
        let value = gateway.generate_json("p", SchemaId::TopicList).await.unwrap();
        assert_eq!(value, json!(["Topic 1: Intro"]));
        assert_eq!(
            client.requests()[0].response_schema,
            Some(SchemaId::TopicList.schema())
        );
    }

    #[tokio::test]
    async fn test_non_json_is_malformed() {
        let (gateway, _) = gateway(vec![MockReply::text("The answer is 2")]);
        assert!(matches!(
            gateway.generate_json("p", SchemaId::Answer).await,
            Err(AppError::MalformedOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_malformed() {
        let (gateway, _) = gateway(vec![MockReply::json(
            json!({ "predictedIndex": "2", "reasoning": "r", "confidence": 0.5 }),
        )]);
        let err = gateway.generate_json("p", SchemaId::Answer).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedOutput(ref m) if m.contains("predictedIndex")));
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let (gateway, _) = gateway(vec![MockReply::text("```json\n[\"a\", \"b\"]\n```")]);
        let topics: Vec<String> = gateway
            .generate_structured("p", SchemaId::TopicList)
            .await
            .unwrap();
        assert_eq!(topics, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_generate_structured() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Answer {
            predicted_index: u8,
            confidence: f64,
        }

        let (gateway, _) = gateway(vec![MockReply::json(
            json!({ "predictedIndex": 3, "reasoning": "r", "confidence": 0.75 }),
        )]);
        let answer: Answer = gateway
            .generate_structured("p", SchemaId::Answer)
            .await
            .unwrap();
        assert_eq!(answer.predicted_index, 3);
        assert_eq!(answer.confidence, 0.75);
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let (gateway, _) = gateway(vec![MockReply::MissingCredential]);
        assert!(matches!(
            gateway.generate_text("p").await,
            Err(AppError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence(" {\"a\": 1} "), "{\"a\": 1}");
    }
}
