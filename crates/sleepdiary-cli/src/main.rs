use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "sleepdiary", version, about = "Sleepdiary questionnaire CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a questionnaire's main line and conditional edges
    Inspect {
        /// Questionnaire JSON file (array of questions)
        questions: PathBuf,
    },
    /// Check a saved answer set against the session rules
    Check {
        /// Questionnaire JSON file
        questions: PathBuf,
        /// Answers JSON file (question id -> answer value)
        answers: PathBuf,
        /// Questionnaire type ("morning" / "evening")
        #[arg(long)]
        questionnaire: Option<String>,
        /// Message language ("da" / "en")
        #[arg(long)]
        locale: Option<String>,
    },
    /// Replay a full wizard session offline and submit it
    Run {
        /// Questionnaire JSON file
        questions: PathBuf,
        /// Answers JSON file (question id -> answer value)
        answers: PathBuf,
        /// Questionnaire type ("morning" / "evening")
        #[arg(long)]
        questionnaire: Option<String>,
        /// Message language ("da" / "en")
        #[arg(long)]
        locale: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Inspect { questions } => commands::inspect::run(&questions),
        Commands::Check {
            questions,
            answers,
            questionnaire,
            locale,
        } => commands::check::run(&questions, &answers, questionnaire, locale),
        Commands::Run {
            questions,
            answers,
            questionnaire,
            locale,
        } => commands::run::run(&questions, &answers, questionnaire, locale).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
