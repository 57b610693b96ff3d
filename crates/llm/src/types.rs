//! Gateway configuration types.

use quizrag_core::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use quizrag_core::AppConfig;
use serde::{Deserialize, Serialize};

/// Explicit configuration handed to the model gateway at construction.
///
/// Nothing in this crate reads the process environment; the credential
/// arrives here already resolved.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Provider identifier ("gemini")
    pub provider: ProviderType,

    /// Model that serves every call
    pub model: String,

    /// Base URL of the generation API
    pub endpoint: String,

    /// Provider credential
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl GatewayConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            provider: ProviderType::Gemini,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
        }
    }

    /// Build from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            provider: ProviderType::Gemini,
            model: config.gateway.model.clone(),
            endpoint: config.gateway.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

// Keeps the credential out of debug logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Google Generative Language API
    Gemini,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
        }
    }
}
