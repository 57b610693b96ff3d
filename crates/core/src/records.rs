//! Records produced by the study operations and persisted by collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AppError, AppResult};
use crate::question::{is_valid_option_index, Difficulty, Language, Question, OPTION_COUNT};

/// A simulated retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedDocument {
    /// Source label, e.g. "study_notes_en.pdf"
    pub source: String,

    /// Passage text (truncated for display)
    pub content: String,

    /// Relevance score in [0, 1]
    pub relevance_score: f64,
}

/// The answer produced by one solve invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,

    /// Predicted 1-based option index
    pub predicted_index: u8,

    pub reasoning: String,

    /// Confidence in [0, 1]
    pub confidence: f64,

    pub retrieved_context: Vec<RetrievedDocument>,
}

impl AnswerRecord {
    /// Whether the prediction matches the question's known answer.
    pub fn is_correct_for(&self, question: &Question) -> bool {
        question.correct_option == Some(self.predicted_index)
    }
}

/// One jury member's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentVote {
    pub agent_name: String,
    pub role: String,
    pub vote_index: u8,
    pub short_reason: String,
}

/// Aggregated jury verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub votes: Vec<AgentVote>,

    /// Option with the highest tally; `None` only when there were no votes
    pub consensus_index: Option<u8>,

    /// Highest tally over total votes, times 100
    pub agreement_percentage: f64,

    /// Another option shares the highest tally
    #[serde(default)]
    pub has_tie: bool,
}

impl VerificationResult {
    /// All votes went to the consensus option.
    pub fn is_unanimous(&self) -> bool {
        !self.votes.is_empty() && self.agreement_percentage >= 100.0
    }

    /// Compact vote summary, e.g. "[2 2 1]".
    pub fn vote_summary(&self) -> String {
        let indices: Vec<String> = self.votes.iter().map(|v| v.vote_index.to_string()).collect();
        format!("[{}]", indices.join(" "))
    }
}

/// A validated question with its answer, as kept in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTest {
    pub id: String,
    pub question: Question,
    pub result: AnswerRecord,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationResult>,
}

impl SavedTest {
    /// Wrap a solved question. The id combines language and creation time.
    pub fn new(
        language: Language,
        question: Question,
        result: AnswerRecord,
        verification: Option<VerificationResult>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("saved_{}_{}", language.code(), now.timestamp_millis()),
            question,
            result,
            saved_at: now,
            verification,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.result.is_correct_for(&self.question)
    }

    /// The option an exam taker must pick: the known answer, else the prediction.
    pub fn expected_option(&self) -> u8 {
        self.question
            .correct_option
            .unwrap_or(self.result.predicted_index)
    }
}

/// An exam built from saved tests, optionally graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<SavedTest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<usize>,
    /// Saved-test id -> chosen 1-based option
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_answers: BTreeMap<String, u8>,
}

impl ExamSession {
    pub fn new(questions: Vec<SavedTest>, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("exam_{}", now.timestamp_millis()),
            created_at: now,
            questions,
            completed_at: None,
            score: None,
            user_answers: BTreeMap::new(),
        }
    }

    /// Record the answers and compute the score.
    ///
    /// Every question needs exactly one answer in 1-4. A rejected answer
    /// set leaves the session untouched.
    pub fn grade(&mut self, answers: BTreeMap<String, u8>, now: DateTime<Utc>) -> AppResult<usize> {
        if answers.len() != self.questions.len() {
            return Err(AppError::InvalidInput(format!(
                "{} answers given for {} questions",
                answers.len(),
                self.questions.len()
            )));
        }

        for test in &self.questions {
            match answers.get(&test.id) {
                None => {
                    return Err(AppError::InvalidInput(format!(
                        "No answer for question {}",
                        test.id
                    )))
                }
                Some(&answer) if !is_valid_option_index(answer) => {
                    return Err(AppError::InvalidInput(format!(
                        "Answer {} for question {} is outside 1-{}",
                        answer, test.id, OPTION_COUNT
                    )))
                }
                Some(_) => {}
            }
        }

        let score = self
            .questions
            .iter()
            .filter(|test| answers.get(&test.id) == Some(&test.expected_option()))
            .count();

        self.user_answers = answers;
        self.score = Some(score);
        self.completed_at = Some(now);
        Ok(score)
    }

    /// Score as a rounded percentage; 0 for an empty or ungraded exam.
    pub fn percentage(&self) -> u32 {
        match self.score {
            Some(score) if !self.questions.is_empty() => {
                ((score as f64 / self.questions.len() as f64) * 100.0).round() as u32
            }
            _ => 0,
        }
    }
}

/// Topic selector for batch generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TopicSelector {
    /// Mixed questions across the whole course
    Global,
    /// One specific topic label
    Specific(String),
}

impl TopicSelector {
    /// Label used for the sentinel.
    pub const GLOBAL_LABEL: &'static str = "Global (all topics)";

    /// Parse a selector. Any text mentioning "Global" is the sentinel.
    pub fn parse(text: &str) -> Self {
        if text.contains("Global") || text.trim().eq_ignore_ascii_case("global") {
            Self::Global
        } else {
            Self::Specific(text.trim().to_string())
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Global => Self::GLOBAL_LABEL,
            Self::Specific(topic) => topic,
        }
    }
}

impl fmt::Display for TopicSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for TopicSelector {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<TopicSelector> for String {
    fn from(selector: TopicSelector) -> Self {
        selector.label().to_string()
    }
}

/// Input contract for batch generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTestConfig {
    pub topic: TopicSelector,
    pub count: usize,
    pub language: Language,
    pub difficulty: Difficulty,
}
