//! Retrieval pipeline: owns the corpus and turns queries into prompts.
//!
//! # States
//!
//! | State | Meaning |
//! |-------|---------|
//! | [`PipelineState::NoCorpus`] | No documents, or none produced a chunk |
//! | [`PipelineState::CorpusReady`] | A non-empty corpus is loaded |
//!
//! A query against a ready corpus that matches nothing is reported as
//! [`QueryOutcome::RetrievalEmpty`]; it does not change the state.
//!
//! The corpus is rebuilt from scratch on every [`RetrievalPipeline::load_documents`]
//! call and never edited in place.

use crate::chunk::Chunker;
use crate::error::ConfigError;
use crate::models::{Chunk, Document};
use crate::prompt::{compose, RetrievedContext};
use crate::rank::{top_matches, DEFAULT_TOP_K};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NoCorpus,
    CorpusReady,
}

/// How a single query was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Relevant chunks were found; the augmented template was used.
    Augmented,
    /// The corpus had chunks but none shared a term with the query.
    RetrievalEmpty,
    /// No corpus was loaded.
    NoCorpus,
}

impl QueryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            QueryOutcome::Augmented => "augmented",
            QueryOutcome::RetrievalEmpty => "retrieval-empty",
            QueryOutcome::NoCorpus => "no-corpus",
        }
    }
}

/// Ordered chunks of every active document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    chunks: Vec<Chunk>,
}

impl Corpus {
    /// Chunk each document in order and concatenate the results.
    pub fn build(chunker: &Chunker, documents: &[Document]) -> (Self, IngestSummary) {
        let mut chunks = Vec::new();
        let mut per_document = Vec::with_capacity(documents.len());

        for doc in documents {
            let pieces = chunker.chunk(&doc.text);
            per_document.push(DocumentChunks {
                name: doc.name.clone(),
                chunks: pieces.len(),
            });
            chunks.extend(pieces.into_iter().enumerate().map(|(index, text)| Chunk {
                document: doc.name.clone(),
                index,
                text,
            }));
        }

        let summary = IngestSummary {
            total_chunks: chunks.len(),
            per_document,
        };
        (Self { chunks }, summary)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Chunk count for one loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunks {
    pub name: String,
    pub chunks: usize,
}

/// What a [`RetrievalPipeline::load_documents`] call produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub per_document: Vec<DocumentChunks>,
    pub total_chunks: usize,
}

impl IngestSummary {
    /// Names of documents that contributed no chunks (empty extraction).
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.per_document
            .iter()
            .filter(|d| d.chunks == 0)
            .map(|d| d.name.as_str())
    }
}

/// A corpus chunk selected for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub score: usize,
    pub chunk: &'a Chunk,
}

/// Context chosen for one query.
#[derive(Debug, Clone)]
pub struct Retrieval<'a> {
    pub context: RetrievedContext,
    pub outcome: QueryOutcome,
    pub matches: Vec<Match<'a>>,
}

/// A composed prompt plus how it was produced.
#[derive(Debug, Clone)]
pub struct PreparedPrompt<'a> {
    pub prompt: String,
    pub outcome: QueryOutcome,
    pub matches: Vec<Match<'a>>,
}

/// Chunker → ranker → prompt composer, over a replaceable corpus.
#[derive(Debug, Clone)]
pub struct RetrievalPipeline {
    chunker: Chunker,
    top_k: usize,
    corpus: Corpus,
}

impl RetrievalPipeline {
    pub fn new(chunker: Chunker, top_k: usize) -> Result<Self, ConfigError> {
        if top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        Ok(Self {
            chunker,
            top_k,
            corpus: Corpus::default(),
        })
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn state(&self) -> PipelineState {
        if self.corpus.is_empty() {
            PipelineState::NoCorpus
        } else {
            PipelineState::CorpusReady
        }
    }

    /// Replace the corpus with the chunks of `documents`.
    ///
    /// Documents with empty text contribute nothing. If no document yields a
    /// chunk the pipeline ends up in [`PipelineState::NoCorpus`].
    pub fn load_documents(&mut self, documents: &[Document]) -> IngestSummary {
        let (corpus, summary) = Corpus::build(&self.chunker, documents);
        self.corpus = corpus;
        summary
    }

    /// Drop the corpus.
    pub fn clear(&mut self) {
        self.corpus = Corpus::default();
    }

    /// Pick the context for `query`.
    pub fn retrieve(&self, query: &str) -> Retrieval<'_> {
        if self.corpus.is_empty() {
            return Retrieval {
                context: RetrievedContext::NoContext,
                outcome: QueryOutcome::NoCorpus,
                matches: Vec::new(),
            };
        }

        let chunks = self.corpus.chunks();
        let matches: Vec<Match<'_>> = top_matches(query, chunks, self.top_k)
            .into_iter()
            .map(|sc| Match {
                score: sc.score,
                chunk: &chunks[sc.index],
            })
            .collect();

        let texts: Vec<&str> = matches.iter().map(|m| m.chunk.text.as_str()).collect();
        let context = RetrievedContext::from_chunks(&texts);
        let outcome = if context.is_augmented() {
            QueryOutcome::Augmented
        } else {
            QueryOutcome::RetrievalEmpty
        };

        Retrieval {
            context,
            outcome,
            matches,
        }
    }

    /// Retrieve and compose in one step.
    pub fn prepare(&self, query: &str) -> PreparedPrompt<'_> {
        let Retrieval {
            context,
            outcome,
            matches,
        } = self.retrieve(query);
        PreparedPrompt {
            prompt: compose(query, &context),
            outcome,
            matches,
        }
    }

    pub fn build_prompt(&self, query: &str) -> String {
        self.prepare(query).prompt
    }
}

impl Default for RetrievalPipeline {
    fn default() -> Self {
        Self {
            chunker: Chunker::default(),
            top_k: DEFAULT_TOP_K,
            corpus: Corpus::default(),
        }
    }
}
