//! Command handlers for the quizrag CLI.
//!
//! Each command is an `Args` struct with an `execute` method.

pub mod evaluate;
pub mod generate;
pub mod history;
pub mod solve;
pub mod verify;

pub use evaluate::EvaluateCommand;
pub use generate::{GenerateCommand, RegenerateCommand, TopicsCommand, VariantsCommand};
pub use history::HistoryCommand;
pub use solve::SolveCommand;
pub use verify::VerifyCommand;

use std::path::{Path, PathBuf};

use clap::Args;
use quizrag_core::catalog::sample_questions;
use quizrag_core::{AppError, AppResult, Question};
use serde::Serialize;

use crate::store::write_atomic;

/// Where a command reads its questions from.
#[derive(Args, Debug, Clone, Default)]
pub struct QuestionSource {
    /// JSON file with one question or an array of questions
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Use the built-in sample questions
    #[arg(long, conflicts_with = "file")]
    pub sample: bool,

    /// Only the question with this id
    #[arg(long)]
    pub id: Option<String>,
}

impl QuestionSource {
    /// Load and validate the selected questions.
    pub fn load(&self) -> AppResult<Vec<Question>> {
        let questions = match (&self.file, self.sample) {
            (Some(path), _) => read_questions(path)?,
            (None, true) => sample_questions(),
            (None, false) => {
                return Err(AppError::InvalidInput(
                    "No questions given. Use --file <path> or --sample".to_string(),
                ))
            }
        };

        let questions: Vec<Question> = match &self.id {
            Some(id) => questions.into_iter().filter(|q| &q.id == id).collect(),
            None => questions,
        };

        if questions.is_empty() {
            return Err(AppError::InvalidInput(match &self.id {
                Some(id) => format!("No question with id '{}'", id),
                None => "The question file is empty".to_string(),
            }));
        }

        for question in &questions {
            question.validate()?;
        }

        tracing::debug!("Loaded {} questions", questions.len());
        Ok(questions)
    }

    /// Load exactly one question.
    pub fn load_one(&self) -> AppResult<Question> {
        let mut questions = self.load()?;
        if questions.len() > 1 {
            return Err(AppError::InvalidInput(format!(
                "{} questions match; pick one with --id",
                questions.len()
            )));
        }
        Ok(questions.remove(0))
    }
}

/// Read a question file holding a single object or an array.
pub fn read_questions(path: &Path) -> AppResult<Vec<Question>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let value: serde_json::Value = serde_json::from_str(&content)?;
    let questions = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(questions)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write pretty JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> AppResult<()> {
    write_atomic(path, &serde_json::to_string_pretty(value)?)?;
    tracing::info!("Wrote {:?}", path);
    Ok(())
}

/// Replace the question with the same id in a question file.
///
/// A file holding one object stays one object.
pub fn update_question_file(path: &Path, question: &Question) -> AppResult<()> {
    let mut questions = read_questions(path)?;
    let single = !serde_json::from_str::<serde_json::Value>(&std::fs::read_to_string(path)?)?
        .is_array();

    let slot = questions
        .iter_mut()
        .find(|q| q.id == question.id)
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Question {} is not in {}",
                question.id,
                path.display()
            ))
        })?;
    *slot = question.clone();

    if single {
        write_json(path, &questions[0])
    } else {
        write_json(path, &questions)
    }
}

/// Options as "  1. text" lines, marking the given index.
pub fn format_options(question: &Question, marked: Option<u8>) -> String {
    question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let index = i as u8 + 1;
            let marker = if marked == Some(index) { "*" } else { " " };
            format!(" {}{}. {}", marker, index, option)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
