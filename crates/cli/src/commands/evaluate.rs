//! Evaluate command handler.
//!
//! Runs the simulated retriever evaluation. No model call is made.

use clap::Args;
use quizrag_core::{config::AppConfig, AppResult};
use quizrag_solver::evaluation::evaluate_retriever;

use super::{print_json, QuestionSource};

/// Report simulated retrieval precision for expected keywords
#[derive(Args, Debug)]
pub struct EvaluateCommand {
    #[command(flatten)]
    pub source: QuestionSource,

    /// Keywords the retrieved documents should contain (comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub keywords: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl EvaluateCommand {
    pub async fn execute(&self, _config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing evaluate command");

        let keywords: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        let reports: Vec<_> = self
            .source
            .load()?
            .iter()
            .map(|question| (question.id.clone(), evaluate_retriever(question, &keywords)))
            .collect();

        if self.json {
            let output: Vec<_> = reports
                .iter()
                .map(|(id, report)| serde_json::json!({ "questionId": id, "report": report }))
                .collect();
            return print_json(&output);
        }

        for (id, report) in &reports {
            println!("[{}] {}", id, report);
        }
        Ok(())
    }
}
