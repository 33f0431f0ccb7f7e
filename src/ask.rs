//! One-shot commands: `advisor prompt`, `advisor ask`, `advisor check-key`.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::generation::OpenRouterClient;
use crate::progress::IngestReporter;
use crate::session::open_session;

/// Print the prompt that would be sent for `question`. No network access.
pub fn run_prompt(
    config: &Config,
    question: &str,
    docs: &[PathBuf],
    reporter: &dyn IngestReporter,
) -> Result<()> {
    let session = open_session(config, docs, reporter)?;
    let prepared = session.pipeline().prepare(question);
    eprintln!("mode: {}", prepared.outcome.label());
    println!("{}", prepared.prompt);
    Ok(())
}

/// Compose a prompt for `question`, send it, and print the answer.
pub fn run_ask(
    config: &Config,
    question: &str,
    docs: &[PathBuf],
    api_key: Option<String>,
    reporter: &dyn IngestReporter,
) -> Result<()> {
    let client = OpenRouterClient::new(&config.generation, api_key)?;
    let mut session = open_session(config, docs, reporter)?;
    let reply = session.ask(question, &client)?;
    eprintln!("mode: {}", reply.outcome.label());
    println!("{}", reply.text);
    Ok(())
}

/// Verify the API key with a one-token completion.
pub fn run_check_key(config: &Config, api_key: Option<String>) -> Result<()> {
    let client = OpenRouterClient::new(&config.generation, api_key)?;
    client.verify_key()?;
    println!(
        "API connected: {} via {}",
        config.generation.model, config.generation.base_url
    );
    Ok(())
}
