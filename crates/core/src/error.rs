//! Error types for Databank.
//!
//! One enum covers every failure category in the service. Soft conditions
//! (missing corpus directory, unreadable document, empty classification) never
//! reach this type; they are absorbed where they happen with a fallback.

use thiserror::Error;
use tokio::task::JoinError;

/// Unified error type for Databank.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors, including a missing backend credential
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failures talking to an LLM provider
    #[error("LLM error: {0}")]
    Llm(String),

    /// Malformed caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Daily quota has been used up
    #[error("Daily quota of {limit} requests exhausted")]
    QuotaExceeded { limit: u32 },

    /// Backend failure while choosing topics
    #[error("Classification failed: {0}")]
    Classification(String),

    /// Backend failure while producing the answer
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Prompt definition errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(#[from] JoinError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
