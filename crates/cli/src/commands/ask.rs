//! Ask command handler.
//!
//! Runs the grounded answer pipeline once from the terminal. The daily quota
//! belongs to the HTTP server process and is not applied here.

use clap::Args;
use databank_core::{config::AppConfig, AppError, AppResult};
use databank_knowledge::AnswerPipeline;
use databank_llm::client_from_config;
use std::path::PathBuf;

/// Ask a question grounded in the topic corpus
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output as JSON (reply, selection mode, topics)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let question = self.get_question()?;
        if question.trim().is_empty() {
            return Err(AppError::Validation("Question must not be empty".to_string()));
        }

        tracing::debug!(question = %question, "Executing ask command");

        let client = client_from_config(config).map_err(AppError::Config)?;
        let pipeline = AnswerPipeline::from_config(config, client)?;

        let answer = pipeline.run(&question).await?;

        if self.json {
            let output = serde_json::json!({
                "reply": answer.reply,
                "mode": answer.mode,
                "topics": answer.topics,
                "contextChars": answer.context_chars,
                "provider": config.provider,
                "model": config.model,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer.reply);
        }

        Ok(())
    }

    /// Question text from the argument or the file.
    fn get_question(&self) -> AppResult<String> {
        if let Some(ref question) = self.question {
            return Ok(question.clone());
        }

        match self.file {
            Some(ref path) => Ok(std::fs::read_to_string(path)?),
            None => Err(AppError::Validation("No question provided".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(question: Option<&str>, file: Option<PathBuf>) -> AskCommand {
        AskCommand {
            question: question.map(str::to_string),
            file,
            json: false,
        }
    }

    #[test]
    fn test_question_from_argument() {
        let cmd = command(Some("What is a cell?"), None);
        assert_eq!(cmd.get_question().unwrap(), "What is a cell?");
    }

    #[test]
    fn test_question_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("question.txt");
        std::fs::write(&path, "Why is the sky blue?").unwrap();

        let cmd = command(None, Some(path));
        assert_eq!(cmd.get_question().unwrap(), "Why is the sky blue?");
    }

    #[test]
    fn test_missing_question() {
        let cmd = command(None, None);
        assert!(matches!(cmd.get_question(), Err(AppError::Validation(_))));
    }
}
