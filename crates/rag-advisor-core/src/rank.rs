//! Lexical-overlap ranking of chunks against a query.
//!
//! # Scoring
//!
//! Query and chunk are lowercased and reduced to their *sets* of terms
//! (maximal runs of alphanumeric characters or `_`). A chunk's score is the
//! number of distinct query terms it contains; repeating a term does not
//! raise the score.
//!
//! # Ordering
//!
//! Score descending, then corpus position ascending. The order is total, so
//! identical inputs always rank identically and the earlier chunk wins ties.
//! Chunks scoring 0 are never returned, even if fewer than `k` remain.
//!
//! # Example
//!
//! ```rust
//! use rag_advisor_core::rank::rank;
//!
//! let chunks = ["Budget review notes.", "Leadership and communication tips."];
//! let top = rank("leadership communication", &chunks, 3);
//! assert_eq!(top, vec!["Leadership and communication tips."]);
//! ```

use std::collections::HashSet;

pub const DEFAULT_TOP_K: usize = 3;

/// A chunk with its overlap score and position in the ranked input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredChunk<'a> {
    pub score: usize,
    pub index: usize,
    pub text: &'a str,
}

/// Lowercased term set of `text`.
pub fn terms(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Score every chunk and return them all in rank order, zero scores included.
pub fn score_chunks<'a, S: AsRef<str>>(query: &str, chunks: &'a [S]) -> Vec<ScoredChunk<'a>> {
    let query_terms = terms(query);

    let mut scored: Vec<ScoredChunk<'a>> = chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let text = chunk.as_ref();
            let score = if query_terms.is_empty() {
                0
            } else {
                let chunk_terms = terms(text);
                query_terms
                    .iter()
                    .filter(|t| chunk_terms.contains(*t))
                    .count()
            };
            ScoredChunk { score, index, text }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
    scored
}

/// The at most `k` best chunks with a non-zero score, in rank order.
pub fn top_matches<'a, S: AsRef<str>>(
    query: &str,
    chunks: &'a [S],
    k: usize,
) -> Vec<ScoredChunk<'a>> {
    score_chunks(query, chunks)
        .into_iter()
        .take_while(|sc| sc.score > 0)
        .take(k)
        .collect()
}

/// Text of the at most `k` most relevant chunks.
pub fn rank<'a, S: AsRef<str>>(query: &str, chunks: &'a [S], k: usize) -> Vec<&'a str> {
    top_matches(query, chunks, k)
        .into_iter()
        .map(|sc| sc.text)
        .collect()
}
