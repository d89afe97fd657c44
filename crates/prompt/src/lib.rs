//! Prompt system for Databank.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions
//! - Built-in definitions for grounded answering and topic classification
//! - Per-workspace overrides in `.databank/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use defaults::{ANSWER_PROMPT_ID, CLASSIFY_PROMPT_ID};
pub use loader::load_prompt;
pub use types::{BuiltPrompt, PromptBehavior, PromptDefinition, PromptOutputSpec};
