//! Error types for quizrag.
//!
//! One enum covers every failure the workspace can report. The model-facing
//! variants (`MissingCredential`, `Provider`, `EmptyResponse`,
//! `MalformedOutput`) form the taxonomy every study operation rejects with;
//! the rest cover configuration, prompt templates, caller input and I/O in
//! the CLI.

use thiserror::Error;

/// Unified error type for quizrag.
///
/// All fallible functions return `Result<T, AppError>`.
/// Errors are represented and propagated, never panicked on.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No provider credential is configured. Raised before any network call.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Transport failure or non-success status from the generation endpoint
    #[error("Provider error: {0}")]
    Provider(String),

    /// The call succeeded but the provider returned no text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Returned text is not JSON or does not match the requested shape
    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    /// Caller-supplied input that an operation cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Prompt definition or template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors outside the model boundary
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error belongs to the model gateway taxonomy.
    pub fn is_gateway_error(&self) -> bool {
        matches!(
            self,
            AppError::MissingCredential(_)
                | AppError::Provider(_)
                | AppError::EmptyResponse(_)
                | AppError::MalformedOutput(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_taxonomy() {
        assert!(AppError::MissingCredential("k".into()).is_gateway_error());
        assert!(AppError::Provider("p".into()).is_gateway_error());
        assert!(AppError::EmptyResponse("e".into()).is_gateway_error());
        assert!(AppError::MalformedOutput("m".into()).is_gateway_error());
        assert!(!AppError::Config("c".into()).is_gateway_error());
        assert!(!AppError::InvalidInput("i".into()).is_gateway_error());
    }

    #[test]
    fn test_display_prefixes() {
        let err = AppError::MalformedOutput("expected array".to_string());
        assert_eq!(err.to_string(), "Malformed output: expected array");
    }
}
