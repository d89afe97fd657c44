//! Topic corpus, selection and grounded answering.
//!
//! Answers questions from a flat directory of topic documents: pick the
//! relevant topics, assemble them into a grounding context, and ask the
//! backend once.

pub mod catalog;
pub mod context;
pub mod generator;
pub mod pipeline;
pub mod selector;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use catalog::CorpusCatalog;
pub use context::{build_context, parse_context, NO_MATERIAL_PLACEHOLDER};
pub use generator::AnswerGenerator;
pub use pipeline::AnswerPipeline;
pub use selector::{topic_matches, TopicSelector};
pub use types::{PipelineAnswer, Selection, SelectionMode, Topic, TopicMeta, MAX_SELECTED_TOPICS};
