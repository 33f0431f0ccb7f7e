//! Document loading progress.
//!
//! Reports which files are being extracted, how many chunks each produced,
//! and which ones were skipped. Progress is emitted on **stderr** so stdout
//! stays clean for prompts and answers.

use std::io::Write;

use rag_advisor_core::pipeline::IngestSummary;

/// A single progress event while loading documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestEvent {
    /// Extracting text from file `n` of `total`.
    Extracting { name: String, n: u64, total: u64 },
    /// Extraction failed; the document is kept with no text.
    Failed { name: String, reason: String },
    /// Document chunked (zero chunks means nothing usable was extracted).
    Chunked { name: String, chunks: u64 },
    /// Corpus rebuilt.
    Ready { documents: u64, chunks: u64 },
    /// Same document set as before; corpus left untouched.
    Reused { documents: u64, chunks: u64 },
}

/// Receives progress events. Implementations write to stderr.
pub trait IngestReporter {
    fn report(&self, event: IngestEvent);
}

/// Human-friendly progress: `load  extracting  2 / 5  handbook.pdf`.
pub struct StderrProgress;

impl IngestReporter for StderrProgress {
    fn report(&self, event: IngestEvent) {
        let line = match &event {
            IngestEvent::Extracting { name, n, total } => {
                format!("load  extracting  {} / {}  {}\n", n, total, name)
            }
            IngestEvent::Failed { name, reason } => {
                format!("load  warning: {}: {}\n", name, reason)
            }
            IngestEvent::Chunked { name, chunks: 0 } => {
                format!("load  {}  no text, skipped\n", name)
            }
            IngestEvent::Chunked { name, chunks } => {
                format!("load  {}  {} chunks\n", name, chunks)
            }
            IngestEvent::Ready { chunks: 0, .. } => {
                "load  no usable text in documents; answering without them\n".to_string()
            }
            IngestEvent::Ready { documents, chunks } => {
                format!("load  ready  {} documents, {} chunks\n", documents, chunks)
            }
            IngestEvent::Reused { documents, chunks } => format!(
                "load  using {} previously processed documents ({} chunks)\n",
                documents, chunks
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl IngestReporter for JsonProgress {
    fn report(&self, event: IngestEvent) {
        let obj = match &event {
            IngestEvent::Extracting { name, n, total } => serde_json::json!({
                "event": "extracting",
                "name": name,
                "n": n,
                "total": total
            }),
            IngestEvent::Failed { name, reason } => serde_json::json!({
                "event": "failed",
                "name": name,
                "reason": reason
            }),
            IngestEvent::Chunked { name, chunks } => serde_json::json!({
                "event": "chunked",
                "name": name,
                "chunks": chunks
            }),
            IngestEvent::Ready { documents, chunks } => serde_json::json!({
                "event": "ready",
                "documents": documents,
                "chunks": chunks
            }),
            IngestEvent::Reused { documents, chunks } => serde_json::json!({
                "event": "reused",
                "documents": documents,
                "chunks": chunks
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl IngestReporter for NoProgress {
    fn report(&self, _event: IngestEvent) {}
}

/// Emit one `Chunked` event per document, then `Ready`.
pub fn report_summary(summary: &IngestSummary, reporter: &dyn IngestReporter) {
    for doc in &summary.per_document {
        reporter.report(IngestEvent::Chunked {
            name: doc.name.clone(),
            chunks: doc.chunks as u64,
        });
    }
    reporter.report(IngestEvent::Ready {
        documents: summary.per_document.len() as u64,
        chunks: summary.total_chunks as u64,
    });
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn IngestReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
