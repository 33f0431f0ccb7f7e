//! `advisor search` and `advisor chunks`: inspect retrieval without calling
//! the generation service.

use anyhow::Result;
use std::path::PathBuf;

use rag_advisor_core::rank::top_matches;

use crate::config::Config;
use crate::documents::load_paths;
use crate::progress::IngestReporter;
use crate::session::open_session;

/// Print the chunks that would be used as context for `query`.
pub fn run_search(
    config: &Config,
    query: &str,
    docs: &[PathBuf],
    limit: Option<usize>,
    reporter: &dyn IngestReporter,
) -> Result<()> {
    let session = open_session(config, docs, reporter)?;
    let corpus = session.pipeline().corpus();

    if corpus.is_empty() {
        println!("No documents loaded.");
        return Ok(());
    }

    let k = limit.unwrap_or(config.retrieval.top_k);
    let matches = top_matches(query, corpus.chunks(), k);

    if matches.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, m) in matches.iter().enumerate() {
        let chunk = &corpus.chunks()[m.index];
        println!(
            "{}. [score {}] {} #{}",
            i + 1,
            m.score,
            chunk.document,
            chunk.index
        );
        println!("    excerpt: \"{}\"", excerpt(&chunk.text, 160));
        println!();
    }

    Ok(())
}

/// Print per-document chunk counts, including documents that yielded none.
pub fn run_chunks(config: &Config, docs: &[PathBuf], reporter: &dyn IngestReporter) -> Result<()> {
    let documents = load_paths(docs, &config.documents, reporter)?;
    let mut pipeline = config.pipeline()?;
    let summary = pipeline.load_documents(documents.documents());
    let chunker = pipeline.chunker();

    println!(
        "chunking  max_chars={} overlap_chars={}",
        chunker.max_chars(),
        chunker.overlap_chars()
    );
    for doc in &summary.per_document {
        if doc.chunks == 0 {
            println!("  {}  no text", doc.name);
        } else {
            println!("  {}  {} chunks", doc.name, doc.chunks);
        }
    }
    println!("  total: {} chunks", summary.total_chunks);
    Ok(())
}

/// Single-line excerpt of at most `max_chars` characters.
fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_flattens_and_truncates() {
        assert_eq!(excerpt("a\n\nb   c", 10), "a b c");
        assert_eq!(excerpt("abcdef ghij", 6), "abcdef…");
    }
}
