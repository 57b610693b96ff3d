//! Question domain types.
//!
//! A [`Question`] always carries exactly four options; the correct option,
//! when known, is a 1-based index.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Target language of prompts and generated content.
///
/// Parsing is lenient: any code other than `eu` or `en` selects Spanish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    /// Castellano
    #[default]
    Es,
    /// Euskara
    Eu,
    /// English
    En,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 3] = [Language::Es, Language::Eu, Language::En];

    /// Map a language code to a language, falling back to Spanish.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "eu" => Self::Eu,
            "en" => Self::En,
            _ => Self::Es,
        }
    }

    /// Two-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::Eu => "eu",
            Self::En => "en",
        }
    }

    /// Display name as shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Es => "Castellano",
            Self::Eu => "Euskara",
            Self::En => "English",
        }
    }

    /// Label used inside prompts when naming the output language.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Self::Es => "SPANISH (CASTELLANO)",
            Self::Eu => "BASQUE (EUSKARA)",
            Self::En => "ENGLISH",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_code(s))
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

/// Difficulty tag, ordered from basic to advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(AppError::InvalidInput(format!(
                "Unknown difficulty: {}. Supported: basic, intermediate, advanced",
                other
            ))),
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Caller-supplied or generated identifier
    pub id: String,

    /// Topic label, e.g. "Topic 3: Permissions and Users"
    pub topic: String,

    /// Question text
    pub statement: String,

    /// The four options, in display order
    pub options: [String; OPTION_COUNT],

    /// 1-based index of the correct option, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Question {
    /// Create a question without a known answer or difficulty.
    pub fn new(
        id: impl Into<String>,
        topic: impl Into<String>,
        statement: impl Into<String>,
        options: [String; OPTION_COUNT],
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            statement: statement.into(),
            options,
            correct_option: None,
            difficulty: None,
        }
    }

    /// Set the 1-based correct option.
    pub fn with_correct_option(mut self, index: u8) -> Self {
        self.correct_option = Some(index);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Check the correct-option invariant.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(index) = self.correct_option {
            if !is_valid_option_index(index) {
                return Err(AppError::InvalidInput(format!(
                    "Question {}: correct option {} is outside 1-{}",
                    self.id, index, OPTION_COUNT
                )));
            }
        }
        Ok(())
    }

    /// Option text by 1-based index.
    pub fn option(&self, index: u8) -> Option<&str> {
        if !is_valid_option_index(index) {
            return None;
        }
        self.options.get(index as usize - 1).map(String::as_str)
    }

    /// Text of the correct option, if known and in range.
    pub fn correct_text(&self) -> Option<&str> {
        self.correct_option.and_then(|index| self.option(index))
    }

    /// The "Topic N" segment of the topic label (text before the first ':').
    pub fn topic_key(&self) -> &str {
        topic_key(&self.topic)
    }

    /// Prefix match on the topic key, ignoring case.
    pub fn matches_topic(&self, prefix: &str) -> bool {
        self.topic_key()
            .to_lowercase()
            .starts_with(&prefix.trim().to_lowercase())
    }
}

/// Whether `index` is a valid 1-based option index.
pub fn is_valid_option_index(index: u8) -> bool {
    (1..=OPTION_COUNT as u8).contains(&index)
}

/// The segment of a topic label before the first ':', trimmed.
pub fn topic_key(topic: &str) -> &str {
    topic.split(':').next().unwrap_or(topic).trim()
}
