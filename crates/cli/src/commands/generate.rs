//! Content generation commands.
//!
//! New question batches, replacement distractors, rephrased variants and
//! topic extraction.

use std::path::PathBuf;

use clap::Args;
use quizrag_core::{
    config::AppConfig, AppResult, AutoTestConfig, Difficulty, Question, TopicSelector,
};
use quizrag_solver::StudyEngine;

use super::{format_options, print_json, update_question_file, write_json, QuestionSource};

/// Generate a batch of new questions
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Topic label, or "Global" for questions across the whole course
    #[arg(short, long, default_value = TopicSelector::GLOBAL_LABEL)]
    pub topic: String,

    /// Number of questions
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,

    /// Difficulty (basic, intermediate, advanced)
    #[arg(short, long, default_value = "intermediate")]
    pub difficulty: Difficulty,

    /// Write the questions to a JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing generate command");

        let auto = AutoTestConfig {
            topic: TopicSelector::parse(&self.topic),
            count: self.count,
            language: config.language,
            difficulty: self.difficulty,
        };

        let engine = StudyEngine::from_config(config)?;
        let questions = engine.generate_batch(&auto).await?;

        emit_questions(&questions, self.output.as_ref(), self.json)
    }
}

/// Replace one wrong option of a question
#[derive(Args, Debug)]
pub struct RegenerateCommand {
    #[command(flatten)]
    pub source: QuestionSource,

    /// 1-based index of the wrong option to replace
    #[arg(long)]
    pub option: u8,

    /// Save the replacement back into the --file question file
    #[arg(long, requires = "file")]
    pub write: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RegenerateCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing regenerate command");

        let mut question = self.source.load_one()?;
        let engine = StudyEngine::from_config(config)?;
        let replacement = engine
            .regenerate_option(&question, self.option, config.language)
            .await?;

        let previous = std::mem::replace(
            &mut question.options[self.option as usize - 1],
            replacement.clone(),
        );

        if let (true, Some(path)) = (self.write, &self.source.file) {
            update_question_file(path, &question)?;
        }

        if self.json {
            print_json(&serde_json::json!({
                "questionId": question.id,
                "option": self.option,
                "previous": previous,
                "replacement": replacement,
                "question": question,
            }))?;
        } else {
            println!("Option {}: \"{}\" -> \"{}\"", self.option, previous, replacement);
            println!("{}", format_options(&question, question.correct_option));
        }

        Ok(())
    }
}

/// Generate rephrased variants of a question
#[derive(Args, Debug)]
pub struct VariantsCommand {
    #[command(flatten)]
    pub source: QuestionSource,

    /// Number of variants
    #[arg(short = 'n', long, default_value_t = 3)]
    pub count: usize,

    /// Write the variants to a JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl VariantsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing variants command");

        let question = self.source.load_one()?;
        let engine = StudyEngine::from_config(config)?;
        let variants = engine
            .generate_variants(&question, self.count, config.language)
            .await?;

        emit_questions(&variants, self.output.as_ref(), self.json)
    }
}

/// Extract course topics from the study notes
#[derive(Args, Debug)]
pub struct TopicsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl TopicsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing topics command");

        let engine = StudyEngine::from_config(config)?;
        let topics = engine.extract_topics().await?;

        if self.json {
            print_json(&topics)?;
        } else {
            for topic in &topics {
                println!("{}", topic);
            }
        }

        Ok(())
    }
}

fn emit_questions(questions: &[Question], output: Option<&PathBuf>, json: bool) -> AppResult<()> {
    if let Some(path) = output {
        write_json(path, questions)?;
    }

    if json {
        return print_json(questions);
    }

    for question in questions {
        let difficulty = question
            .difficulty
            .map(|d| format!(" [{}]", d))
            .unwrap_or_default();
        println!("[{}] {}{}", question.id, question.topic, difficulty);
        println!("{}", question.statement);
        println!("{}", format_options(question, question.correct_option));
        println!();
    }

    Ok(())
}
