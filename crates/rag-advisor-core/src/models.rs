//! Documents and chunks that flow through the retrieval pipeline.

/// Extracted text of one uploaded source, plus the name it was loaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// True when extraction produced nothing worth chunking.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A fragment of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Name of the parent [`Document`].
    pub document: String,
    /// Position within the parent document, starting at 0.
    pub index: usize,
    pub text: String,
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
