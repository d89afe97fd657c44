//! LLM integration crate for Databank.
//!
//! Provider-agnostic access to the generative backend through the
//! [`LlmClient`] trait.
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default, needs an API key)
//! - **Ollama**: Local LLM runtime
//! - **Mock**: Scripted replies for tests and offline development
//!
//! # Example
//! ```no_run
//! use databank_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{complete_within, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{client_from_config, create_client};
pub use providers::{GeminiClient, MockClient, OllamaClient};
pub use types::ProviderType;
