//! Boundary-aware text chunker with overlap.
//!
//! Splits document text into fragments of at most `max_chars` characters.
//! Consecutive fragments share up to `overlap_chars` characters so that a
//! sentence cut at a fragment edge still appears whole in one of them.
//!
//! Every fragment is an exact slice of the input: nothing is trimmed or
//! rewritten, so concatenating the fragments while dropping each overlapped
//! prefix reproduces the input.
//!
//! # Algorithm
//!
//! 1. If the remaining text fits in `max_chars`, emit it and stop.
//! 2. Otherwise look for a break inside the window
//!    `(start + overlap_chars, start + max_chars]`, preferring in order:
//!    a paragraph break (`\n\n`), a sentence end (`.`, `!`, `?` followed by
//!    whitespace), any whitespace. Fall back to a hard cut at the window edge.
//! 3. Start the next fragment `overlap_chars` before the break, moved forward
//!    to the first word boundary so overlaps do not begin mid-word.
//!
//! Lengths are counted in characters, never bytes.
//!
//! # Example
//!
//! ```rust
//! use rag_advisor_core::chunk::Chunker;
//!
//! let chunker = Chunker::new(40, 10).unwrap();
//! let chunks = chunker
//!     .chunk("Leadership requires clear communication. Strategic planning aligns teams.");
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0], "Leadership requires clear communication.");
//! ```

use std::ops::Range;

use crate::error::ConfigError;

pub const DEFAULT_MAX_CHARS: usize = 1000;
pub const DEFAULT_OVERLAP_CHARS: usize = 200;

/// Validated chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_chars: usize,
    overlap_chars: usize,
}

impl Chunker {
    /// Build a chunker, rejecting `max_chars == 0` and `overlap_chars >= max_chars`.
    pub fn new(max_chars: usize, overlap_chars: usize) -> Result<Self, ConfigError> {
        if max_chars == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if overlap_chars >= max_chars {
            return Err(ConfigError::OverlapTooLarge {
                overlap: overlap_chars,
                max_chars,
            });
        }
        Ok(Self {
            max_chars,
            overlap_chars,
        })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn overlap_chars(&self) -> usize {
        self.overlap_chars
    }

    /// Split `text` into ordered, overlapping fragments.
    ///
    /// Fragments that are only whitespace (long blank runs) are dropped, so
    /// empty or whitespace-only text yields no fragments.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.spans(text)
            .into_iter()
            .map(|span| &text[span])
            .filter(|piece| !piece.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Byte ranges covering all of `text`, whitespace-only ones included.
    ///
    /// Ranges always fall on char boundaries. Each range after the first
    /// starts strictly after its predecessor's start and no later than its
    /// predecessor's end.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let byte_at = |i: usize| chars.get(i).map(|&(b, _)| b).unwrap_or(text.len());

        let mut spans = Vec::new();
        let mut start = 0;
        loop {
            if chars.len() - start <= self.max_chars {
                spans.push(byte_at(start)..text.len());
                break;
            }
            let end = find_break(&chars, start, start + self.max_chars, self.overlap_chars);
            spans.push(byte_at(start)..byte_at(end));
            start = next_start(&chars, start, end, self.overlap_chars);
        }
        spans
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            overlap_chars: DEFAULT_OVERLAP_CHARS,
        }
    }
}

/// Chunk `text` with raw parameters, validating them first.
pub fn chunk_text(
    text: &str,
    max_chars: usize,
    overlap_chars: usize,
) -> Result<Vec<String>, ConfigError> {
    Ok(Chunker::new(max_chars, overlap_chars)?.chunk(text))
}

fn char_at(chars: &[(usize, char)], i: usize) -> Option<char> {
    chars.get(i).map(|&(_, c)| c)
}

/// Char position (exclusive) where the fragment starting at `start` ends.
///
/// Breaks at or before `start + overlap` are ignored: the next fragment
/// starts up to `overlap` chars before the break and must still move forward.
fn find_break(chars: &[(usize, char)], start: usize, limit: usize, overlap: usize) -> usize {
    let candidates = || (start + overlap + 1..=limit).rev();

    candidates()
        .find(|&b| is_paragraph_break(chars, b))
        .or_else(|| candidates().find(|&b| is_sentence_break(chars, b)))
        .or_else(|| candidates().find(|&b| is_whitespace_break(chars, b)))
        .unwrap_or(limit)
}

fn is_paragraph_break(chars: &[(usize, char)], b: usize) -> bool {
    b >= 2 && char_at(chars, b - 1) == Some('\n') && char_at(chars, b - 2) == Some('\n')
}

fn is_sentence_break(chars: &[(usize, char)], b: usize) -> bool {
    matches!(char_at(chars, b - 1), Some('.' | '!' | '?'))
        && char_at(chars, b).map_or(true, char::is_whitespace)
}

fn is_whitespace_break(chars: &[(usize, char)], b: usize) -> bool {
    char_at(chars, b - 1).is_some_and(char::is_whitespace)
}

/// First word boundary at or after `end - overlap`; a plain `end - overlap`
/// when the overlap region is a single unbroken token.
fn next_start(chars: &[(usize, char)], start: usize, end: usize, overlap: usize) -> usize {
    let floor = end.saturating_sub(overlap).max(start + 1);
    (floor..=end)
        .find(|&p| {
            char_at(chars, p - 1).is_some_and(char::is_whitespace)
                || char_at(chars, p).is_some_and(char::is_whitespace)
        })
        .unwrap_or(floor)
}
