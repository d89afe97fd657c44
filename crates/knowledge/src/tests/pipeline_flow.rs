//! Tests for corpus-size driven selection through the whole pipeline.

use crate::catalog::CorpusCatalog;
use crate::context::{parse_context, NO_MATERIAL_PLACEHOLDER};
use crate::generator::AnswerGenerator;
use crate::pipeline::AnswerPipeline;
use crate::selector::TopicSelector;
use crate::types::SelectionMode;
use databank_llm::MockClient;
use databank_prompt::{load_prompt, ANSWER_PROMPT_ID, CLASSIFY_PROMPT_ID};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to lay out a corpus directory.
    fn corpus(files: &[(&str, String)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, body) in files {
            std::fs::write(temp.path().join(format!("{}.md", name)), body).unwrap();
        }
        temp
    }

    /// Helper to build a pipeline over `dir` backed by `client`.
    fn pipeline(dir: &TempDir, client: Arc<MockClient>) -> AnswerPipeline {
        let workspace = dir.path();
        let timeout = Duration::from_secs(5);
        let catalog = CorpusCatalog::new(workspace, &["md".to_string()]);
        let selector = TopicSelector::new(
            client.clone(),
            "test-model",
            timeout,
            load_prompt(workspace, CLASSIFY_PROMPT_ID).unwrap(),
        );
        let generator = AnswerGenerator::new(
            client,
            "test-model",
            timeout,
            load_prompt(workspace, ANSWER_PROMPT_ID).unwrap(),
        );
        AnswerPipeline::new(catalog, selector, generator)
    }

    /// Grounding context the generator saw, parsed back into sections.
    fn answer_context(client: &MockClient) -> String {
        let prompt = client.prompts().pop().unwrap();
        let start = prompt.find("[Reference material]\n").unwrap() + "[Reference material]\n".len();
        let end = prompt.find("\n\n[Question]").unwrap();
        prompt[start..end].to_string()
    }

    fn five_topics() -> Vec<(&'static str, String)> {
        vec![
            ("Biology", format!("Cells. {}", "b".repeat(700))),
            ("ChemistryBasics", format!("Acids. {}", "c".repeat(700))),
            ("History", format!("Wars. {}", "h".repeat(700))),
            ("Mathematics", format!("Proofs. {}", "m".repeat(700))),
            ("Physics", format!("Forces. {}", "p".repeat(700))),
        ]
    }

    #[tokio::test]
    async fn test_empty_corpus_uses_placeholder() {
        let dir = corpus(&[]);
        let client = Arc::new(MockClient::new().with_reply("General answer"));

        let answer = pipeline(&dir, client.clone()).run("What is a cell?").await.unwrap();

        assert_eq!(answer.mode, SelectionMode::Empty);
        assert!(answer.topics.is_empty());
        assert_eq!(answer.reply, "General answer");
        assert_eq!(client.calls(), 1);
        assert_eq!(answer_context(&client), NO_MATERIAL_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_two_documents_included_in_full_without_classification() {
        let long = "x".repeat(900);
        let dir = corpus(&[("Biology", long.clone()), ("Physics", "F = ma".to_string())]);
        let client = Arc::new(MockClient::new().with_reply("Answer"));

        let answer = pipeline(&dir, client.clone()).run("q").await.unwrap();

        assert_eq!(answer.mode, SelectionMode::All);
        assert_eq!(answer.topics, vec!["Biology", "Physics"]);
        // Only the answer call, no classification call
        assert_eq!(client.calls(), 1);

        let sections = parse_context(&answer_context(&client));
        assert_eq!(
            sections,
            vec![
                ("Biology".to_string(), long),
                ("Physics".to_string(), "F = ma".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_five_documents_matched_by_substring() {
        let files = five_topics();
        let dir = corpus(&files);
        let client = Arc::new(
            MockClient::new()
                .with_reply("Biology, Chemistry")
                .with_reply("Grounded answer"),
        );

        let answer = pipeline(&dir, client.clone()).run("q").await.unwrap();

        assert_eq!(answer.mode, SelectionMode::Matched);
        assert_eq!(answer.topics, vec!["Biology", "ChemistryBasics"]);
        assert_eq!(answer.reply, "Grounded answer");
        assert_eq!(client.calls(), 2);

        let sections = parse_context(&answer_context(&client));
        assert_eq!(
            sections,
            vec![
                ("Biology".to_string(), files[0].1.clone()),
                ("ChemistryBasics".to_string(), files[1].1.clone()),
            ]
        );
    }

    #[tokio::test]
    async fn test_five_documents_no_match_truncates_all() {
        let files = five_topics();
        let dir = corpus(&files);
        let client = Arc::new(
            MockClient::new()
                .with_reply("Unrelated, Nonexistent")
                .with_reply("Best effort answer"),
        );

        let answer = pipeline(&dir, client.clone()).run("q").await.unwrap();

        assert_eq!(answer.mode, SelectionMode::Fallback);
        assert_eq!(answer.topics.len(), 5);

        let sections = parse_context(&answer_context(&client));
        assert_eq!(sections.len(), 5);
        for ((id, content), (expected_id, body)) in sections.iter().zip(files.iter()) {
            assert_eq!(id, expected_id);
            let expected: String = body.chars().take(500).collect();
            assert_eq!(content, &format!("{}...", expected));
        }
    }

    #[tokio::test]
    async fn test_classification_failure_stops_before_generation() {
        let files = five_topics();
        let dir = corpus(&files);
        let client = Arc::new(
            MockClient::new()
                .with_failure("connection reset")
                .with_reply("unused"),
        );

        let result = pipeline(&dir, client.clone()).run("q").await;

        assert!(matches!(
            result,
            Err(databank_core::AppError::Classification(_))
        ));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_corpus_directory_degrades_to_placeholder() {
        let dir = corpus(&[]);
        let missing = dir.path().join("not-here");
        let client = Arc::new(MockClient::new().with_reply("General answer"));
        let timeout = Duration::from_secs(5);

        let pipeline = AnswerPipeline::new(
            CorpusCatalog::new(&missing, &["md".to_string()]),
            TopicSelector::new(
                client.clone(),
                "m",
                timeout,
                load_prompt(dir.path(), CLASSIFY_PROMPT_ID).unwrap(),
            ),
            AnswerGenerator::new(
                client.clone(),
                "m",
                timeout,
                load_prompt(dir.path(), ANSWER_PROMPT_ID).unwrap(),
            ),
        );

        let answer = pipeline.run("q").await.unwrap();
        assert_eq!(answer.mode, SelectionMode::Empty);
        assert_eq!(answer_context(&client), NO_MATERIAL_PLACEHOLDER);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_document_with_divider_line_reaches_generator_intact() {
        let notes = "Chapter 1\n\n==========\n\nChapter 2 details".to_string();
        let dir = corpus(&[("Notes", notes.clone()), ("Physics", "F = ma".to_string())]);
        let client = Arc::new(MockClient::new().with_reply("Answer"));

        let answer = pipeline(&dir, client.clone()).run("q").await.unwrap();

        assert_eq!(answer.mode, SelectionMode::All);
        let sections = parse_context(&answer_context(&client));
        assert_eq!(
            sections,
            vec![
                ("Notes".to_string(), notes),
                ("Physics".to_string(), "F = ma".to_string()),
            ]
        );
    }
}
