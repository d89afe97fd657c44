//! LLM provider factory.
//!
//! Resolves a provider name plus optional endpoint and secret into a ready
//! client. A missing credential is reported as an error string so callers can
//! surface it as a configuration failure.

use crate::client::LlmClient;
use crate::providers::{ollama::OLLAMA_DEFAULT_URL, GeminiClient, OllamaClient};
use crate::types::ProviderType;
use databank_core::AppConfig;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by Gemini)
///
/// # Errors
/// Returns an error if the provider is unknown or a required key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    match provider_type {
        ProviderType::Gemini => {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| "Gemini provider requires API key".to_string())?;
            let client = match endpoint {
                Some(url) => GeminiClient::with_base_url(url, api_key),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(OLLAMA_DEFAULT_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
    }
}

/// Create the client for the configured provider.
///
/// When the provider needs a key and none resolved, the error names the
/// environment variable that should hold it.
pub fn client_from_config(config: &AppConfig) -> Result<Arc<dyn LlmClient>, String> {
    let provider = config.provider.as_str();
    let endpoint = config.provider_endpoint(provider);
    let api_key = config.resolve_api_key(provider);

    create_client(provider, endpoint.as_deref(), api_key.as_deref()).map_err(|reason| {
        match config.api_key_env(provider) {
            Some(var) if api_key.is_none() => format!("{} is not set", var),
            _ => reason,
        }
    })
}
