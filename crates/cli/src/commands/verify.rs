//! Verify command handler.

use clap::Args;
use quizrag_core::{config::AppConfig, AppResult};
use quizrag_solver::StudyEngine;

use super::{format_options, print_json, QuestionSource};

/// Ask the expert jury to vote on a question
#[derive(Args, Debug)]
pub struct VerifyCommand {
    #[command(flatten)]
    pub source: QuestionSource,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl VerifyCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing verify command");

        let question = self.source.load_one()?;
        let engine = StudyEngine::from_config(config)?;
        let result = engine.verify(&question, config.language).await?;

        if self.json {
            return print_json(&result);
        }

        println!("[{}] {}", question.id, question.statement);
        println!("{}", format_options(&question, result.consensus_index));
        for vote in &result.votes {
            println!(
                "  {} ({}): {} - {}",
                vote.agent_name, vote.role, vote.vote_index, vote.short_reason
            );
        }

        match result.consensus_index {
            Some(index) => {
                println!(
                    "Consensus: option {} with {:.2}% agreement",
                    index, result.agreement_percentage
                );
                if result.has_tie {
                    println!("Warning: the jury is split");
                }
                if let Some(correct) = question.correct_option.filter(|c| *c != index) {
                    println!("Note: the stored answer is option {}", correct);
                }
            }
            None => println!("The jury returned no votes"),
        }

        Ok(())
    }
}
