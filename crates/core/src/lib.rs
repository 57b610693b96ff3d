//! quizrag core library
//!
//! This crate provides the foundations shared by every quizrag crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The question/answer domain model and static course material

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod question;
pub mod records;

// Re-export commonly used types
pub use config::{AgentConfig, AppConfig, GatewaySettings, SimulatedProvider};
pub use error::{AppError, AppResult};
pub use question::{Difficulty, Language, Question, OPTION_COUNT};
pub use records::{
    AgentVote, AnswerRecord, AutoTestConfig, ExamSession, RetrievedDocument, SavedTest,
    TopicSelector, VerificationResult,
};
