//! # RAG Advisor Core
//!
//! Pure, synchronous retrieval logic for RAG Advisor: data models, the
//! overlapping chunker, the lexical ranker, prompt templates, and the
//! retrieval pipeline that ties them together.
//!
//! This crate performs no I/O. Document extraction, the generation-service
//! client, configuration files, and the CLI live in the `rag-advisor` crate.
//!
//! ```text
//! text ──▶ chunk ──▶ Corpus ──▶ rank(query) ──▶ prompt::compose ──▶ String
//! ```
//!
//! # Example
//!
//! ```rust
//! use rag_advisor_core::models::Document;
//! use rag_advisor_core::pipeline::{QueryOutcome, RetrievalPipeline};
//!
//! let mut pipeline = RetrievalPipeline::default();
//! pipeline.load_documents(&[Document::new(
//!     "handbook.pdf",
//!     "Retrospectives help teams improve. Keep them short and blameless.",
//! )]);
//!
//! let prepared = pipeline.prepare("How do I keep retrospectives short?");
//! assert_eq!(prepared.outcome, QueryOutcome::Augmented);
//! assert!(prepared.prompt.contains("Keep them short and blameless."));
//! ```

pub mod chunk;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod rank;
