//! Solve command handler.
//!
//! Answers questions through simulated retrieval, optionally runs the jury
//! and saves the results to the history.

use chrono::Utc;
use clap::Args;
use futures::future::join_all;
use quizrag_core::{
    config::AppConfig, AnswerRecord, AppError, AppResult, Question, SavedTest, VerificationResult,
};
use quizrag_solver::StudyEngine;

use super::{format_options, print_json, QuestionSource};
use crate::store::TestStore;

/// Answer questions with retrieved context
#[derive(Args, Debug)]
pub struct SolveCommand {
    #[command(flatten)]
    pub source: QuestionSource,

    /// Label answers with the configured simulated agent
    #[arg(long)]
    pub agent: bool,

    /// Also ask the expert jury about each question
    #[arg(long)]
    pub verify: bool,

    /// Save the results to the history
    #[arg(long)]
    pub save: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

struct Solved {
    question: Question,
    record: AnswerRecord,
    verification: Option<VerificationResult>,
}

impl SolveCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing solve command");
        tracing::debug!("Solve options: {:?}", self);

        let questions = self.source.load()?;
        let engine = StudyEngine::from_config(config)?;
        let language = config.language;
        let agent = self.agent.then_some(&config.agent);

        let outcomes = join_all(questions.into_iter().map(|question| {
            let engine = &engine;
            async move {
                let record = engine.solve(&question, agent, language).await?;
                let verification = if self.verify {
                    Some(engine.verify(&question, language).await?)
                } else {
                    None
                };
                Ok::<_, AppError>(Solved {
                    question,
                    record,
                    verification,
                })
            }
        }))
        .await;

        let solved = outcomes.into_iter().collect::<AppResult<Vec<_>>>()?;

        let saved_ids = if self.save {
            let now = Utc::now();
            let tests = solved
                .iter()
                .map(|s| {
                    SavedTest::new(
                        language,
                        s.question.clone(),
                        s.record.clone(),
                        s.verification.clone(),
                        now,
                    )
                })
                .collect();
            TestStore::for_language(config, language).append(tests)?
        } else {
            Vec::new()
        };

        if self.json {
            let output: Vec<_> = solved
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "question": s.question,
                        "result": s.record,
                        "verification": s.verification,
                    })
                })
                .collect();
            print_json(&output)?;
            return Ok(());
        }

        for s in &solved {
            print_solved(s);
        }
        if !saved_ids.is_empty() {
            println!("Saved {} tests: {}", saved_ids.len(), saved_ids.join(", "));
        }

        Ok(())
    }
}

fn print_solved(solved: &Solved) {
    let Solved {
        question,
        record,
        verification,
    } = solved;

    let verdict = match question.correct_option {
        Some(_) if record.is_correct_for(question) => " (correct)",
        Some(_) => " (wrong)",
        None => "",
    };

    println!("[{}] {}", question.id, question.statement);
    println!("{}", format_options(question, Some(record.predicted_index)));
    println!(
        "Answer: {}{} | confidence {:.2}",
        record.predicted_index, verdict, record.confidence
    );
    println!("{}", record.reasoning);

    if let Some(result) = verification {
        match result.consensus_index {
            Some(index) => println!(
                "Jury: {} -> option {} ({:.0}% agreement{})",
                result.vote_summary(),
                index,
                result.agreement_percentage,
                if result.has_tie { ", tie" } else { "" }
            ),
            None => println!("Jury: no votes"),
        }
    }
    println!();
}
