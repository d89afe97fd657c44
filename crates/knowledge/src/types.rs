//! Knowledge system type definitions.

use serde::Serialize;
use std::path::PathBuf;

/// Hard cap on how many topics a classified selection may ground one answer with.
pub const MAX_SELECTED_TOPICS: usize = 3;

/// A topic document found in the corpus directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicMeta {
    /// Filename without its extension
    pub identifier: String,

    /// Where the content lives
    pub source: PathBuf,
}

/// A loaded topic document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub identifier: String,
    pub content: String,
    pub byte_size: usize,
}

/// How a selection was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No topics exist
    Empty,
    /// Corpus small enough to include everything in full
    All,
    /// Classification picked these topics; included in full
    Matched,
    /// Classification matched nothing; every topic included as a truncated excerpt
    Fallback,
}

impl SelectionMode {
    /// Whether topic content is cut down to an excerpt in this mode.
    pub fn truncates(&self) -> bool {
        matches!(self, SelectionMode::Fallback)
    }
}

/// Topics chosen to ground one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub mode: SelectionMode,
    pub topics: Vec<TopicMeta>,
}

impl Selection {
    pub fn empty() -> Self {
        Self {
            mode: SelectionMode::Empty,
            topics: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Identifiers of the selected topics, in selection order.
    pub fn identifiers(&self) -> Vec<String> {
        self.topics.iter().map(|t| t.identifier.clone()).collect()
    }
}

/// Result of running the full answer pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineAnswer {
    /// Backend output, verbatim
    pub reply: String,

    /// How the grounding topics were chosen
    pub mode: SelectionMode,

    /// Topics used as grounding
    pub topics: Vec<String>,

    /// Length of the grounding context in characters
    pub context_chars: usize,
}
