//! Prompt templates for the management advisor.
//!
//! [`compose`] is the single point where "RAG mode" and "standard mode"
//! diverge. The decision is carried by [`RetrievedContext`]: retrieval that
//! produced text selects the augmented template, anything else selects the
//! bare template.

/// Expert framing shared by both templates.
pub const PERSONA: &str =
    "You are an experienced top tier management consultant and business advisor.";

/// Instruction sentence that only the augmented template carries.
pub const CONTEXT_INSTRUCTION: &str = "Please provide a comprehensive answer based on the context provided, \
and if the context doesn't fully address the question, supplement with your general management knowledge.";

/// Outcome of retrieval as seen by the prompt composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievedContext {
    /// Non-empty text assembled from the matching chunks.
    WithContext(String),
    NoContext,
}

impl RetrievedContext {
    /// Wrap retrieved text; blank text becomes [`NoContext`](Self::NoContext).
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::NoContext
        } else {
            Self::WithContext(text)
        }
    }

    /// Join chunks with a blank line between them.
    pub fn from_chunks<S: AsRef<str>>(chunks: &[S]) -> Self {
        let joined = chunks
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n\n");
        Self::from_text(joined)
    }

    pub fn is_augmented(&self) -> bool {
        matches!(self, Self::WithContext(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::WithContext(text) => Some(text),
            Self::NoContext => None,
        }
    }
}

impl From<Option<&str>> for RetrievedContext {
    fn from(text: Option<&str>) -> Self {
        text.map_or(Self::NoContext, Self::from_text)
    }
}

/// Build the prompt sent to the generation service.
pub fn compose(query: &str, context: &RetrievedContext) -> String {
    match context {
        RetrievedContext::WithContext(context) => format!(
            "{PERSONA}\n\
             Use the following context from management documents to provide accurate, relevant advice.\n\
             \n\
             Context from management documents:\n\
             {context}\n\
             \n\
             User Question: {query}\n\
             \n\
             {CONTEXT_INSTRUCTION}\n\
             Always provide practical, actionable insights."
        ),
        RetrievedContext::NoContext => format!(
            "{PERSONA}\n\
             Provide professional, strategic advice on the following question:\n\
             \n\
             User Question: {query}\n\
             \n\
             Please provide practical, actionable insights with examples when appropriate."
        ),
    }
}
