//! History command handler.
//!
//! Browses the saved tests of the active language and runs exams built
//! from them.

use chrono::Utc;
use clap::{Args, Subcommand};
use quizrag_core::{config::AppConfig, AppError, AppResult, Difficulty, ExamSession, SavedTest};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{format_options, print_json};
use crate::store::TestStore;

/// Saved tests and exams
#[derive(Args, Debug)]
pub struct HistoryCommand {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List saved tests
    List(HistoryListCommand),
    /// Show one saved test
    Show(HistoryShowCommand),
    /// Delete a saved test
    Delete(HistoryDeleteCommand),
    /// Build and grade exams from saved tests
    Exam(ExamCommand),
}

impl HistoryCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = TestStore::for_language(config, config.language);
        tracing::debug!("History store: {:?}", store.path());

        match &self.action {
            HistoryAction::List(cmd) => cmd.execute(&store),
            HistoryAction::Show(cmd) => cmd.execute(&store),
            HistoryAction::Delete(cmd) => cmd.execute(&store),
            HistoryAction::Exam(cmd) => cmd.execute(&store),
        }
    }
}

/// List saved tests
#[derive(Args, Debug)]
pub struct HistoryListCommand {
    /// Only tests whose topic starts with this key, e.g. "Topic 3"
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Only tests of this difficulty (basic, intermediate, advanced)
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryListCommand {
    pub fn execute(&self, store: &TestStore) -> AppResult<()> {
        let tests = filter_tests(store.load()?, self.topic.as_deref(), self.difficulty);

        if self.json {
            return print_json(&tests);
        }

        if tests.is_empty() {
            println!("No saved tests");
            return Ok(());
        }

        for test in &tests {
            let mark = if test.question.correct_option.is_none() {
                "?"
            } else if test.is_correct() {
                "+"
            } else {
                "-"
            };
            println!(
                "{} {} [{}] {}",
                mark,
                test.id,
                test.question.topic_key(),
                test.question.statement
            );
        }
        Ok(())
    }
}

/// Show one saved test
#[derive(Args, Debug)]
pub struct HistoryShowCommand {
    /// Saved test id
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryShowCommand {
    pub fn execute(&self, store: &TestStore) -> AppResult<()> {
        let test = store
            .get(&self.id)?
            .ok_or_else(|| AppError::InvalidInput(format!("Saved test not found: {}", self.id)))?;

        if self.json {
            return print_json(&test);
        }

        println!("{} (saved {})", test.id, test.saved_at.to_rfc3339());
        println!("{}", test.question.topic);
        println!("{}", test.question.statement);
        println!(
            "{}",
            format_options(&test.question, Some(test.result.predicted_index))
        );
        println!(
            "Predicted {} with confidence {:.2}",
            test.result.predicted_index, test.result.confidence
        );
        println!("{}", test.result.reasoning);
        for doc in &test.result.retrieved_context {
            println!("Source: {} ({:.2})", doc.source, doc.relevance_score);
        }
        if let Some(verification) = &test.verification {
            println!(
                "Jury: {} ({:.2}% agreement)",
                verification.vote_summary(),
                verification.agreement_percentage
            );
        }
        Ok(())
    }
}

/// Delete a saved test
#[derive(Args, Debug)]
pub struct HistoryDeleteCommand {
    /// Saved test id
    pub id: String,
}

impl HistoryDeleteCommand {
    pub fn execute(&self, store: &TestStore) -> AppResult<()> {
        if !store.delete(&self.id)? {
            return Err(AppError::InvalidInput(format!(
                "Saved test not found: {}",
                self.id
            )));
        }
        println!("Deleted {}", self.id);
        Ok(())
    }
}

/// Build and grade exams from saved tests
#[derive(Args, Debug)]
pub struct ExamCommand {
    #[command(subcommand)]
    pub action: ExamAction,
}

#[derive(Subcommand, Debug)]
pub enum ExamAction {
    /// Start an exam from saved tests
    Start(ExamStartCommand),
    /// Grade an exam with answers in question order
    Grade(ExamGradeCommand),
    /// List exams
    List(ExamListCommand),
}

impl ExamCommand {
    pub fn execute(&self, store: &TestStore) -> AppResult<()> {
        match &self.action {
            ExamAction::Start(cmd) => cmd.execute(store),
            ExamAction::Grade(cmd) => cmd.execute(store),
            ExamAction::List(cmd) => cmd.execute(store),
        }
    }
}

/// Start an exam from saved tests
#[derive(Args, Debug)]
pub struct ExamStartCommand {
    /// Maximum number of questions (5 with --random)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Only tests whose topic starts with this key
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Only tests of this difficulty (basic, intermediate, advanced)
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Shuffle the matching tests before picking
    #[arg(short, long)]
    pub random: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExamStartCommand {
    pub fn execute(&self, store: &TestStore) -> AppResult<()> {
        let matching = filter_tests(store.load()?, self.topic.as_deref(), self.difficulty);
        let count = self
            .count
            .or(self.random.then_some(RANDOM_EXAM_SIZE));
        let tests = pick_exam_tests(matching, count, self.random, &mut rand::thread_rng());
        if tests.is_empty() {
            return Err(AppError::InvalidInput(
                "No saved tests to build an exam from".to_string(),
            ));
        }

        let exam = ExamSession::new(tests, Utc::now());
        let path = store.save_exam(&exam)?;
        tracing::info!("Started exam {} with {} questions", exam.id, exam.questions.len());

        if self.json {
            let questions: Vec<_> = exam.questions.iter().map(|t| &t.question).collect();
            return print_json(&serde_json::json!({
                "examId": exam.id,
                "path": path,
                "questions": questions,
            }));
        }

        println!("Exam {}", exam.id);
        for (i, test) in exam.questions.iter().enumerate() {
            println!("{}. {}", i + 1, test.question.statement);
            println!("{}", format_options(&test.question, None));
        }
        println!(
            "Grade with: quizrag history exam grade {} --answers 1,2,...",
            exam.id
        );
        Ok(())
    }
}

/// Grade an exam with answers in question order
#[derive(Args, Debug)]
pub struct ExamGradeCommand {
    /// Exam id
    pub exam_id: String,

    /// Chosen options in question order (comma separated, 1-4)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub answers: Vec<u8>,
}

impl ExamGradeCommand {
    pub fn execute(&self, store: &TestStore) -> AppResult<()> {
        let mut exam = store.load_exam(&self.exam_id)?;

        if self.answers.len() != exam.questions.len() {
            return Err(AppError::InvalidInput(format!(
                "{} answers given for {} questions",
                self.answers.len(),
                exam.questions.len()
            )));
        }

        let answers = exam
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(test, answer)| (test.id.clone(), *answer))
            .collect();

        let score = exam.grade(answers, Utc::now())?;
        store.save_exam(&exam)?;

        println!(
            "Score: {}/{} ({}%)",
            score,
            exam.questions.len(),
            exam.percentage()
        );
        for (i, test) in exam.questions.iter().enumerate() {
            let chosen = exam.user_answers.get(&test.id).copied();
            let expected = test.expected_option();
            if chosen != Some(expected) {
                println!(
                    "{}. expected {}, answered {}",
                    i + 1,
                    expected,
                    chosen.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
                );
            }
        }
        Ok(())
    }
}

/// List exams
#[derive(Args, Debug)]
pub struct ExamListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExamListCommand {
    pub fn execute(&self, store: &TestStore) -> AppResult<()> {
        let exams = store.list_exams()?;

        if self.json {
            return print_json(&exams);
        }

        for exam in &exams {
            let status = match exam.score {
                Some(score) => format!("{}/{} ({}%)", score, exam.questions.len(), exam.percentage()),
                None => "not graded".to_string(),
            };
            println!("{} {} questions, {}", exam.id, exam.questions.len(), status);
        }
        Ok(())
    }
}

/// Exam size when `--random` is given without `--count`.
const RANDOM_EXAM_SIZE: usize = 5;

fn filter_tests(
    tests: Vec<SavedTest>,
    topic: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Vec<SavedTest> {
    tests
        .into_iter()
        .filter(|t| topic.map_or(true, |prefix| t.question.matches_topic(prefix)))
        .filter(|t| difficulty.map_or(true, |d| t.question.difficulty == Some(d)))
        .collect()
}

/// Tests for a new exam: optionally shuffled, then cut to `count`.
fn pick_exam_tests<R: Rng + ?Sized>(
    mut tests: Vec<SavedTest>,
    count: Option<usize>,
    shuffle: bool,
    rng: &mut R,
) -> Vec<SavedTest> {
    if shuffle {
        tests.shuffle(rng);
    }
    if let Some(count) = count {
        tests.truncate(count);
    }
    tests
}
