//! `advisor chat`: interactive advisor session on stdin/stdout.
//!
//! Lines starting with `/` are commands; anything else is a question.
//! Errors are printed and the loop keeps going; only `/quit` or end of
//! input ends the session.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::documents::load_paths;
use crate::generation::{GenerationService, OpenRouterClient};
use crate::progress::IngestReporter;
use crate::session::{load_and_report, open_session, LoadOutcome, Mode, Session};

const HELP: &str = "\
Commands:
  /load PATH...   replace the loaded documents
  /clear          drop the loaded documents
  /reset          clear the conversation history
  /history        show the conversation so far
  /mode           show whether answers use documents
  /help           show this help
  /quit           leave";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Empty,
    Ask(String),
    Load(Vec<PathBuf>),
    Clear,
    Reset,
    History,
    Mode,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if !line.starts_with('/') {
        return Command::Ask(line.to_string());
    }

    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    match name {
        "/load" => Command::Load(parts.map(PathBuf::from).collect()),
        "/clear" => Command::Clear,
        "/reset" => Command::Reset,
        "/history" => Command::History,
        "/mode" => Command::Mode,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// Run the interactive session against the configured generation service.
pub fn run_chat(
    config: &Config,
    docs: &[PathBuf],
    api_key: Option<String>,
    reporter: &dyn IngestReporter,
) -> Result<()> {
    let client = OpenRouterClient::new(&config.generation, api_key)?;
    let mut session = open_session(config, docs, reporter)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    chat_loop(
        &mut session,
        &client,
        config,
        reporter,
        stdin.lock(),
        stdout.lock(),
    )
}

/// Read lines from `input` until `/quit` or EOF, writing replies to `output`.
pub fn chat_loop<R: BufRead, W: Write>(
    session: &mut Session,
    service: &dyn GenerationService,
    config: &Config,
    reporter: &dyn IngestReporter,
    mut input: R,
    mut output: W,
) -> Result<()> {
    writeln!(
        output,
        "Management advisor ({}). {}. Type /help for commands.",
        service.model_name(),
        session.mode().label()
    )?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Mode => writeln!(output, "{}", session.mode().label())?,
            Command::Unknown(name) => {
                writeln!(output, "Error: unknown command {} (try /help)", name)?
            }
            Command::Clear => {
                session.clear_documents();
                writeln!(output, "Documents cleared. {}", session.mode().label())?;
            }
            Command::Reset => {
                session.clear_history();
                writeln!(output, "History cleared.")?;
            }
            Command::History => {
                if session.history().is_empty() {
                    writeln!(output, "(no messages yet)")?;
                }
                for turn in session.history() {
                    writeln!(output, "[{}] {}", turn.role.as_str(), turn.content)?;
                }
            }
            Command::Load(paths) => {
                if paths.is_empty() {
                    writeln!(output, "Error: /load needs at least one path")?;
                    continue;
                }
                match load_paths(&paths, &config.documents, reporter) {
                    Ok(documents) => {
                        let outcome = load_and_report(session, &documents, reporter);
                        let note = match outcome {
                            LoadOutcome::Reused => " (unchanged)",
                            _ => "",
                        };
                        writeln!(
                            output,
                            "Loaded {} documents, {} chunks{}. {}",
                            documents.len(),
                            session.pipeline().corpus().len(),
                            note,
                            session.mode().label()
                        )?;
                    }
                    Err(e) => writeln!(output, "Error: {:#}", e)?,
                }
            }
            Command::Ask(question) => {
                match session.ask(&question, service) {
                    Ok(reply) => {
                        writeln!(output, "[{}]", Mode::from(reply.outcome).label())?;
                        writeln!(output, "{}", reply.text)?;
                    }
                    Err(e) => writeln!(output, "Error: {}", e)?,
                }
            }
        }
    }

    Ok(())
}
