//! Setup-time configuration errors.
//!
//! Everything else in this crate is total: empty documents, empty queries
//! and empty corpora produce empty results or the bare prompt, never an
//! error.

use thiserror::Error;

/// Invalid retrieval parameters. Raised when a [`Chunker`](crate::chunk::Chunker)
/// or [`RetrievalPipeline`](crate::pipeline::RetrievalPipeline) is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("chunk size must be > 0")]
    ZeroChunkSize,

    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({max_chars})")]
    OverlapTooLarge { overlap: usize, max_chars: usize },

    #[error("top_k must be >= 1")]
    ZeroTopK,
}
