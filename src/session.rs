//! Conversation session.
//!
//! A [`Session`] owns the retrieval pipeline, the fingerprint of the loaded
//! document set, and the chat history. All of it is explicit state held by
//! the caller; nothing lives in globals.

use anyhow::Result;
use std::path::PathBuf;

use rag_advisor_core::pipeline::{IngestSummary, PipelineState, QueryOutcome, RetrievalPipeline};

use crate::config::Config;
use crate::documents::{load_paths, DocumentSet};
use crate::generation::{GenerationError, GenerationService};
use crate::progress::{report_summary, IngestEvent, IngestReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Whether questions are currently answered with document context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rag,
    Standard,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Rag => "RAG Mode",
            Mode::Standard => "Standard Mode",
        }
    }
}

/// The mode a single answer was produced in: only an augmented prompt counts
/// as RAG, even when documents are loaded.
impl From<QueryOutcome> for Mode {
    fn from(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Augmented => Mode::Rag,
            QueryOutcome::RetrievalEmpty | QueryOutcome::NoCorpus => Mode::Standard,
        }
    }
}

/// Result of [`Session::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The corpus was rebuilt from the new documents.
    Rebuilt(IngestSummary),
    /// Same documents as last time; the existing corpus was kept.
    Reused,
    /// The set was empty; the corpus was dropped.
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub outcome: QueryOutcome,
}

pub struct Session {
    pipeline: RetrievalPipeline,
    loaded: Option<String>,
    history: Vec<Turn>,
}

impl Session {
    pub fn new(pipeline: RetrievalPipeline) -> Self {
        Self {
            pipeline,
            loaded: None,
            history: Vec::new(),
        }
    }

    pub fn pipeline(&self) -> &RetrievalPipeline {
        &self.pipeline
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        match self.pipeline.state() {
            PipelineState::CorpusReady => Mode::Rag,
            PipelineState::NoCorpus => Mode::Standard,
        }
    }

    /// Make `documents` the active set, rebuilding only if it changed.
    pub fn load(&mut self, documents: &DocumentSet) -> LoadOutcome {
        if documents.is_empty() {
            self.clear_documents();
            return LoadOutcome::Cleared;
        }

        let fingerprint = documents.fingerprint();
        if self.loaded.as_deref() == Some(fingerprint.as_str()) {
            return LoadOutcome::Reused;
        }

        let summary = self.pipeline.load_documents(documents.documents());
        self.loaded = Some(fingerprint);
        LoadOutcome::Rebuilt(summary)
    }

    pub fn clear_documents(&mut self) {
        self.pipeline.clear();
        self.loaded = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Compose a prompt for `question`, send it, and record both turns.
    ///
    /// On failure the question stays in the history and the error is returned.
    pub fn ask(
        &mut self,
        question: &str,
        service: &dyn GenerationService,
    ) -> Result<Reply, GenerationError> {
        self.history.push(Turn {
            role: Role::User,
            content: question.to_string(),
        });

        let prepared = self.pipeline.prepare(question);
        let (prompt, outcome) = (prepared.prompt, prepared.outcome);

        let text = service.generate(&prompt)?;
        self.history.push(Turn {
            role: Role::Assistant,
            content: text.clone(),
        });
        Ok(Reply { text, outcome })
    }
}

/// Build a session from config and load the documents at `paths` (if any).
pub fn open_session(
    config: &Config,
    paths: &[PathBuf],
    reporter: &dyn IngestReporter,
) -> Result<Session> {
    let mut session = Session::new(config.pipeline()?);
    if !paths.is_empty() {
        let documents = load_paths(paths, &config.documents, reporter)?;
        load_and_report(&mut session, &documents, reporter);
    }
    Ok(session)
}

/// [`Session::load`], reporting the outcome.
pub fn load_and_report(
    session: &mut Session,
    documents: &DocumentSet,
    reporter: &dyn IngestReporter,
) -> LoadOutcome {
    let outcome = session.load(documents);
    match &outcome {
        LoadOutcome::Rebuilt(summary) => report_summary(summary, reporter),
        LoadOutcome::Reused => reporter.report(IngestEvent::Reused {
            documents: documents.len() as u64,
            chunks: session.pipeline().corpus().len() as u64,
        }),
        LoadOutcome::Cleared => {}
    }
    outcome
}
