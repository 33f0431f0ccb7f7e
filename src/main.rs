//! # RAG Advisor CLI (`advisor`)
//!
//! Ask a management advisor questions, optionally grounded in local
//! documents.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `advisor prompt "<question>"` | Print the prompt that would be sent (no network) |
//! | `advisor search "<query>"` | Show the chunks retrieved for a query |
//! | `advisor chunks` | Show per-document chunk counts |
//! | `advisor ask "<question>"` | Send one question and print the answer |
//! | `advisor chat` | Interactive session with history |
//! | `advisor check-key` | Verify the API key |
//!
//! Every document-aware command takes `--docs PATH...` (files or
//! directories). Without documents, questions are answered in standard mode.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rag_advisor::config::load_config_or_default;
use rag_advisor::progress::ProgressMode;
use rag_advisor::{ask, chat, search};

/// RAG Advisor: management advice grounded in your documents.
#[derive(Parser)]
#[command(
    name = "advisor",
    about = "RAG Advisor: management advice grounded in your documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/advisor.toml`. Built-in defaults are used when
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/advisor.toml")]
    config: PathBuf,

    /// Progress output on stderr. Defaults to `human` when stderr is a
    /// terminal, otherwise `off`.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the composed prompt for a question without sending it.
    Prompt {
        question: String,

        /// Documents to ground the answer in (files or directories).
        #[arg(long, num_args = 1..)]
        docs: Vec<PathBuf>,
    },

    /// Show the chunks that would be used as context for a query.
    Search {
        query: String,

        #[arg(long, num_args = 1..)]
        docs: Vec<PathBuf>,

        /// Maximum number of results (defaults to `retrieval.top_k`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show how the documents split into chunks.
    Chunks {
        #[arg(long, num_args = 1..)]
        docs: Vec<PathBuf>,
    },

    /// Ask one question and print the answer.
    Ask {
        question: String,

        #[arg(long, num_args = 1..)]
        docs: Vec<PathBuf>,

        /// API key (overrides the environment variable from config).
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Start an interactive session.
    Chat {
        #[arg(long, num_args = 1..)]
        docs: Vec<PathBuf>,

        #[arg(long)]
        api_key: Option<String>,
    },

    /// Check that the API key is accepted.
    CheckKey {
        #[arg(long)]
        api_key: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = load_config_or_default(&cli.config)?;
    let mode = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
    let reporter = mode.reporter();

    match cli.command {
        Commands::Prompt { question, docs } => {
            ask::run_prompt(&cfg, &question, &docs, reporter.as_ref())?;
        }
        Commands::Search { query, docs, limit } => {
            search::run_search(&cfg, &query, &docs, limit, reporter.as_ref())?;
        }
        Commands::Chunks { docs } => {
            search::run_chunks(&cfg, &docs, reporter.as_ref())?;
        }
        Commands::Ask {
            question,
            docs,
            api_key,
        } => {
            ask::run_ask(&cfg, &question, &docs, api_key, reporter.as_ref())?;
        }
        Commands::Chat { docs, api_key } => {
            chat::run_chat(&cfg, &docs, api_key, reporter.as_ref())?;
        }
        Commands::CheckKey { api_key } => {
            ask::run_check_key(&cfg, api_key)?;
        }
    }

    Ok(())
}
