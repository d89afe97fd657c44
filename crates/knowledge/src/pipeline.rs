//! End-to-end answer pipeline: list → select → assemble → generate.
//!
//! Quota gating is the caller's concern; this pipeline never charges anything.

use crate::catalog::CorpusCatalog;
use crate::context::build_context;
use crate::generator::AnswerGenerator;
use crate::selector::TopicSelector;
use crate::types::PipelineAnswer;
use databank_core::{AppConfig, AppResult};
use databank_llm::LlmClient;
use databank_prompt::{load_prompt, ANSWER_PROMPT_ID, CLASSIFY_PROMPT_ID};
use std::sync::Arc;

/// Grounded question answering over one corpus.
pub struct AnswerPipeline {
    catalog: CorpusCatalog,
    selector: TopicSelector,
    generator: AnswerGenerator,
}

impl AnswerPipeline {
    pub fn new(
        catalog: CorpusCatalog,
        selector: TopicSelector,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            catalog,
            selector,
            generator,
        }
    }

    /// Wire a pipeline from configuration, loading prompts from the workspace.
    pub fn from_config(config: &AppConfig, client: Arc<dyn LlmClient>) -> AppResult<Self> {
        let catalog = CorpusCatalog::new(config.materials_path(), &config.extensions);
        let timeout = config.request_timeout();

        let selector = TopicSelector::new(
            client.clone(),
            &config.model,
            timeout,
            load_prompt(&config.workspace, CLASSIFY_PROMPT_ID)?,
        );
        let generator = AnswerGenerator::new(
            client,
            &config.model,
            timeout,
            load_prompt(&config.workspace, ANSWER_PROMPT_ID)?,
        );

        Ok(Self::new(catalog, selector, generator))
    }

    pub fn catalog(&self) -> &CorpusCatalog {
        &self.catalog
    }

    /// Answer `query` grounded in the corpus.
    ///
    /// Directory listing and document reads run on the blocking pool.
    pub async fn run(&self, query: &str) -> AppResult<PipelineAnswer> {
        let catalog = self.catalog.clone();
        let topics = tokio::task::spawn_blocking(move || catalog.list()).await?;

        let selection = self.selector.select(query, &topics).await?;

        let catalog = self.catalog.clone();
        let (selection, context) = tokio::task::spawn_blocking(move || {
            let context = build_context(&selection, &catalog);
            (selection, context)
        })
        .await?;

        let reply = self.generator.answer(query, &context).await?;

        tracing::info!(
            mode = ?selection.mode,
            topics = selection.topics.len(),
            corpus = topics.len(),
            "Answered query"
        );

        Ok(PipelineAnswer {
            reply,
            mode: selection.mode,
            topics: selection.identifiers(),
            context_chars: context.chars().count(),
        })
    }
}
