//! quizrag CLI
//!
//! Main entry point for the quizrag command-line tool.
//! Solves, verifies and generates multiple-choice study questions.

mod commands;
mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    EvaluateCommand, GenerateCommand, HistoryCommand, RegenerateCommand, SolveCommand,
    TopicsCommand, VariantsCommand, VerifyCommand,
};
use quizrag_core::{
    config::AppConfig,
    logging::{self, LogFormat},
    AppResult, Language,
};

/// quizrag - study questions answered with retrieved context
#[derive(Parser, Debug)]
#[command(name = "quizrag")]
#[command(about = "Solve, verify and generate study questions", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "QUIZRAG_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "QUIZRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Output language (es, eu, en)
    #[arg(short, long, global = true)]
    language: Option<Language>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log format (pretty, json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer questions with retrieved context
    Solve(SolveCommand),

    /// Generate a batch of new questions
    Generate(GenerateCommand),

    /// Replace one wrong option of a question
    Regenerate(RegenerateCommand),

    /// Generate rephrased variants of a question
    Variants(VariantsCommand),

    /// Ask the expert jury to vote on a question
    Verify(VerifyCommand),

    /// Extract course topics from the study notes
    Topics(TopicsCommand),

    /// Simulated retriever evaluation
    Evaluate(EvaluateCommand),

    /// Saved tests and exams
    History(HistoryCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Solve(_) => "solve",
            Commands::Generate(_) => "generate",
            Commands::Regenerate(_) => "regenerate",
            Commands::Variants(_) => "variants",
            Commands::Verify(_) => "verify",
            Commands::Topics(_) => "topics",
            Commands::Evaluate(_) => "evaluate",
            Commands::History(_) => "history",
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, config file and environment
    let config = AppConfig::load_with(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.language,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, cli.log_format)?;

    config.validate()?;

    tracing::info!("quizrag starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Model: {}", config.gateway.model);
    tracing::debug!("Language: {}", config.language);

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match &cli.command {
        Commands::Solve(cmd) => cmd.execute(&config).await,
        Commands::Generate(cmd) => cmd.execute(&config).await,
        Commands::Regenerate(cmd) => cmd.execute(&config).await,
        Commands::Variants(cmd) => cmd.execute(&config).await,
        Commands::Verify(cmd) => cmd.execute(&config).await,
        Commands::Topics(cmd) => cmd.execute(&config).await,
        Commands::Evaluate(cmd) => cmd.execute(&config).await,
        Commands::History(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
