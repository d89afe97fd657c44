//! Topic selection.
//!
//! | Corpus size | Outcome |
//! |-------------|---------|
//! | 0 | `Empty` |
//! | 1-2 | `All`, no backend call |
//! | 3+ | backend classification, then `Matched` or `Fallback` |
//!
//! A classification that names nothing recognizable is a valid answer and
//! falls back to every topic as an excerpt. A backend failure is not; it
//! propagates as [`AppError::Classification`].

use crate::types::{Selection, SelectionMode, TopicMeta, MAX_SELECTED_TOPICS};
use databank_core::{AppError, AppResult};
use databank_llm::{complete_within, LlmClient, LlmRequest};
use databank_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Corpora at or below this size skip classification.
pub const SMALL_CORPUS_MAX: usize = 2;

/// Fuzzy match between a backend-proposed name and a catalog identifier.
///
/// Matches when either string contains the other, ignoring case. This
/// tolerates a backend that shortens (`Chemistry` for `ChemistryBasics`) or
/// decorates (`Biology notes` for `Biology`) a name. Empty strings never match.
pub fn topic_matches(candidate: &str, identifier: &str) -> bool {
    let candidate = candidate.trim().to_lowercase();
    let identifier = identifier.trim().to_lowercase();

    if candidate.is_empty() || identifier.is_empty() {
        return false;
    }

    candidate.contains(&identifier) || identifier.contains(&candidate)
}

/// Split a classification reply into candidate names.
///
/// Commas (ASCII, ideographic and full-width) and newlines separate
/// candidates; surrounding quotes, bullets and brackets are stripped.
pub fn parse_candidates(reply: &str) -> Vec<String> {
    reply
        .split([',', '、', '，', '\n'])
        .map(|candidate| {
            candidate
                .trim_matches(|c: char| {
                    c.is_whitespace()
                        || matches!(
                            c,
                            '"' | '\'' | '`' | '*' | '-' | '•' | '「' | '」' | '[' | ']' | '.'
                        )
                })
                .to_string()
        })
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

/// Catalog topics matched by any candidate, in catalog order, capped at
/// [`MAX_SELECTED_TOPICS`].
pub fn match_topics(candidates: &[String], topics: &[TopicMeta]) -> Vec<TopicMeta> {
    topics
        .iter()
        .filter(|topic| {
            candidates
                .iter()
                .any(|candidate| topic_matches(candidate, &topic.identifier))
        })
        .take(MAX_SELECTED_TOPICS)
        .cloned()
        .collect()
}

/// Chooses which topics ground an answer.
pub struct TopicSelector {
    client: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
    prompt: PromptDefinition,
}

impl TopicSelector {
    /// Create a selector that classifies with `prompt` (see `topics.classify`).
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

    /// Select topics for `query` out of `topics`.
    pub async fn select(&self, query: &str, topics: &[TopicMeta]) -> AppResult<Selection> {
        match topics.len() {
            0 => {
                tracing::info!("Corpus is empty, answering without material");
                Ok(Selection::empty())
            }
            n if n <= SMALL_CORPUS_MAX => {
                tracing::debug!(count = n, "Small corpus, including every topic");
                Ok(Selection {
                    mode: SelectionMode::All,
                    topics: topics.to_vec(),
                })
            }
            _ => self.classify(query, topics).await,
        }
    }

    async fn classify(&self, query: &str, topics: &[TopicMeta]) -> AppResult<Selection> {
        let listing = topics
            .iter()
            .map(|topic| format!("- {}", topic.identifier))
            .collect::<Vec<_>>()
            .join("\n");

        let mut variables = HashMap::new();
        variables.insert("topics".to_string(), listing);
        variables.insert("query".to_string(), query.to_string());
        variables.insert("max_topics".to_string(), MAX_SELECTED_TOPICS.to_string());

        let built = build_prompt(&self.prompt, variables)?;
        let mut request = LlmRequest::new(built.user, &self.model).with_temperature(0.0);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let response = complete_within(self.client.as_ref(), &request, self.timeout)
            .await
            .map_err(|e| AppError::Classification(e.to_string()))?;

        let candidates = parse_candidates(&response.content);
        let matched = match_topics(&candidates, topics);

        if matched.is_empty() {
            tracing::warn!(
                reply = %response.content.trim(),
                "Classification matched no topic, falling back to excerpts of all topics"
            );
            return Ok(Selection {
                mode: SelectionMode::Fallback,
                topics: topics.to_vec(),
            });
        }

        tracing::info!(
            topics = ?matched.iter().map(|t| t.identifier.as_str()).collect::<Vec<_>>(),
            "Classification selected topics"
        );

        Ok(Selection {
            mode: SelectionMode::Matched,
            topics: matched,
        })
    }
}
