//! Identifiers for generated questions.

use chrono::{DateTime, Utc};
use quizrag_core::Language;

/// `auto_{lang}_{millis}_{index}`
pub fn auto_question_id(language: Language, now: DateTime<Utc>, index: usize) -> String {
    format!("auto_{}_{}_{}", language.code(), now.timestamp_millis(), index)
}

/// `variant_{millis}_{index}`
pub fn variant_id(now: DateTime<Utc>, index: usize) -> String {
    format!("variant_{}_{}", now.timestamp_millis(), index)
}
