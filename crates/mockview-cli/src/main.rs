//! mockview CLI: record interview answers and get feedback on them.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mockview",
    version,
    about = "Mock-interview answer scoring and feedback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one question/answer pair for a session
    Record {
        /// Session identifier
        #[arg(long)]
        session: String,

        /// Question text
        #[arg(long)]
        question: String,

        /// Answer text (empty means unanswered)
        #[arg(long, default_value = "")]
        answer: String,

        /// Record store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List recorded session ids
    Sessions {
        /// Record store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Produce feedback for one or more sessions
    Feedback {
        /// Session identifiers (comma-separated)
        #[arg(long)]
        session: String,

        /// Skip the generative model and score heuristically
        #[arg(long)]
        heuristic_only: bool,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report here instead of stdout (a directory for several sessions)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Record store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate interview questions for a role
    Questions {
        /// Target role, e.g. "Backend Engineer"
        #[arg(long)]
        role: String,

        /// Skills to focus on (comma-separated)
        #[arg(long)]
        skills: Option<String>,

        /// Candidate experience in years
        #[arg(long, default_value = "0")]
        experience: u32,

        /// Number of questions
        #[arg(long, default_value = "10")]
        count: usize,

        /// Provider name from the config (defaults to default_provider)
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter mockview.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mockview=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Record {
            session,
            question,
            answer,
            store,
            config,
        } => commands::record::execute(session, question, answer, store, config).await,
        Commands::Sessions { store, config } => commands::sessions::execute(store, config).await,
        Commands::Feedback {
            session,
            heuristic_only,
            format,
            output,
            store,
            config,
        } => {
            commands::feedback::execute(session, heuristic_only, format, output, store, config)
                .await
        }
        Commands::Questions {
            role,
            skills,
            experience,
            count,
            provider,
            config,
        } => {
            commands::questions::execute(role, skills, experience, count, provider, config).await
        }
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
