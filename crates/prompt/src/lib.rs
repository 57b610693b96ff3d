//! Prompt system for quizrag.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions, built in and overridable per workspace
//! - Handlebars template rendering
//! - Language, difficulty and option-list directives shared across prompts

pub mod builder;
pub mod directives;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{AnswerPromptInput, PromptBuilder, UNKNOWN_ANSWER};
pub use loader::{builtin_ids, builtin_prompt, list_prompts, load_prompt, resolve_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, OutputFormat, PromptDefinition, PromptOutputSpec};
