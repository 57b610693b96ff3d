//! LLM provider factory.
//!
//! Resolves the configured provider to a client implementation. The
//! credential comes from the [`GatewayConfig`]; a missing one is not an error
//! here and surfaces on the first call instead.

use crate::client::LlmClient;
use crate::providers::GeminiClient;
use crate::types::{GatewayConfig, ProviderType};
use std::sync::Arc;

/// Create an LLM client for the configured provider.
pub fn create_client(config: &GatewayConfig) -> Arc<dyn LlmClient> {
    match config.provider {
        ProviderType::Gemini => Arc::new(GeminiClient::with_endpoint(
            config.endpoint.clone(),
            config.api_key.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_gemini_client() {
        let client = create_client(&GatewayConfig::new(Some("key".to_string())));
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn test_create_without_credential() {
        let client = create_client(&GatewayConfig::new(None).with_endpoint("http://localhost:9"));
        assert_eq!(client.provider_name(), "gemini");
    }
}
