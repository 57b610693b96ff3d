//! Google Generative Language (Gemini) provider.
//!
//! API: `POST {endpoint}/v1beta/models/{model}:generateContent`, authenticated
//! with the `x-goog-api-key` header. Structured calls add a
//! `generationConfig` asking for JSON that matches the request's schema.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use quizrag_core::config::DEFAULT_ENDPOINT;
use quizrag_core::{AppError, AppResult};
use serde_json::{json, Value};

/// Gemini client.
pub struct GeminiClient {
    /// Base URL for the API
    endpoint: String,

    /// Credential; checked on every call before any network activity
    api_key: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client for the public endpoint.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    /// Create a client with a custom base URL.
    pub fn with_endpoint(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }

    /// Convert an LlmRequest to the generateContent body.
    fn build_body(request: &LlmRequest) -> Value {
        let mut body = json!({
            "contents": [{
                "parts": [{ "text": request.prompt }]
            }]
        });

        if let Some(schema) = &request.response_schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema.to_wire(),
            });
        }

        body
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(body: &Value) -> Option<String> {
        let parts = body["candidates"]
            .as_array()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate["content"]["parts"].as_array())?;

        let text: String = parts.iter().filter_map(|part| part["text"].as_str()).collect();
        Some(text)
    }

    fn extract_usage(body: &Value) -> LlmUsage {
        body["usageMetadata"]
            .as_object()
            .map(|usage| {
                LlmUsage::new(
                    usage
                        .get("promptTokenCount")
                        .and_then(Value::as_u64)
                        .unwrap_or(0) as u32,
                    usage
                        .get("candidatesTokenCount")
                        .and_then(Value::as_u64)
                        .unwrap_or(0) as u32,
                )
            })
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::MissingCredential(
                "No Gemini API key configured. Set GEMINI_API_KEY or QUIZRAG_API_KEY".to_string(),
            )
        })?;

        tracing::debug!(
            model = %request.model,
            structured = request.is_structured(),
            prompt_chars = request.prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.url(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Provider(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse Gemini response: {}", e)))?;

        let content = Self::extract_text(&body);
        tracing::debug!(
            chars = content.as_ref().map(String::len).unwrap_or(0),
            "Received completion from Gemini"
        );

        Ok(LlmResponse {
            content,
            model: body["modelVersion"]
                .as_str()
                .unwrap_or(&request.model)
                .to_string(),
            usage: Self::extract_usage(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaId;

    #[test]
    fn test_url_building() {
        let client = GeminiClient::with_endpoint("http://localhost:8080/", None);
        assert_eq!(
            client.url("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_free_text_body_has_no_generation_config() {
        let body = GeminiClient::build_body(&LlmRequest::new("Hello", "gemini-2.5-flash"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_structured_body() {
        let request = LlmRequest::new("Answer", "gemini-2.5-flash")
            .with_schema(SchemaId::Answer.schema());
        let body = GeminiClient::build_body(&request);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] }
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 4 }
        });
        assert_eq!(GeminiClient::extract_text(&body).as_deref(), Some("{\"a\": 1}"));
        assert_eq!(GeminiClient::extract_usage(&body).total_tokens, 14);

        assert_eq!(GeminiClient::extract_text(&json!({ "candidates": [] })), None);
    }

    #[tokio::test]
    async fn test_missing_credential_before_network() {
        // Unroutable endpoint: reaching the network would fail with a Provider error
        let client = GeminiClient::with_endpoint("http://127.0.0.1:1", Some("   ".to_string()));
        let result = client
            .complete(&LlmRequest::new("Hello", "gemini-2.5-flash"))
            .await;
        assert!(matches!(result, Err(AppError::MissingCredential(_))));
    }
}
