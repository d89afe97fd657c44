//! Grounded answer generation.

use databank_core::{AppError, AppResult};
use databank_llm::{complete_within, LlmClient, LlmRequest};
use databank_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Turns a query plus grounding context into the final reply.
pub struct AnswerGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
    prompt: PromptDefinition,
}

impl AnswerGenerator {
    /// Create a generator rendering `prompt` (see `answer.grounded`).
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        timeout: Duration,
        prompt: PromptDefinition,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
            prompt,
        }
    }

    /// Ask the backend once and return its text verbatim.
    ///
    /// Failures and timeouts surface as [`AppError::Generation`]; nothing is retried.
    pub async fn answer(&self, query: &str, context: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("context".to_string(), context.to_string());
        variables.insert("query".to_string(), query.to_string());

        let built = build_prompt(&self.prompt, variables)?;
        let mut request = LlmRequest::new(built.user, &self.model);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let response = complete_within(self.client.as_ref(), &request, self.timeout)
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        tracing::debug!(
            provider = self.client.provider_name(),
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Generated answer"
        );

        Ok(response.content)
    }
}
