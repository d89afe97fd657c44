//! Prompt loader for YAML prompt definitions.

use crate::defaults::builtin_yaml;
use crate::types::PromptDefinition;
use databank_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Directory holding workspace prompt overrides.
fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".databank/prompts")
}

/// Load a prompt definition by ID.
///
/// A workspace override at `.databank/prompts/<id>.yml` wins; otherwise the
/// built-in definition of the same ID is used.
///
/// # Example
/// ```no_run
/// use databank_prompt::{load_prompt, ANSWER_PROMPT_ID};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), ANSWER_PROMPT_ID)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    let definition = if prompt_file.exists() {
        tracing::debug!("Loading prompt override from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        serde_yaml::from_str::<PromptDefinition>(&contents).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to parse prompt YAML {:?}: {}",
                prompt_file, e
            ))
        })?
    } else {
        let yaml = builtin_yaml(prompt_id).ok_or_else(|| {
            AppError::Prompt(format!(
                "Prompt not found: {} (no override at {:?} and no built-in)",
                prompt_id, prompt_file
            ))
        })?;

        serde_yaml::from_str::<PromptDefinition>(yaml).map_err(|e| {
            AppError::Prompt(format!("Built-in prompt {} is invalid: {}", prompt_id, e))
        })?
    };

    validate_prompt(&definition)?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file for {} declares id {}",
            prompt_id, definition.id
        )));
    }

    tracing::debug!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if def.system.as_deref().is_some_and(|system| system.trim().is_empty()) {
        return Err(AppError::Prompt(
            "Prompt system instruction cannot be empty when present".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{ANSWER_PROMPT_ID, CLASSIFY_PROMPT_ID};
    use std::fs;
    use tempfile::TempDir;

    fn write_override(dir: &Path, id: &str, body: &str) {
        let prompts = prompts_dir(dir);
        fs::create_dir_all(&prompts).unwrap();
        fs::write(prompts.join(format!("{}.yml", id)), body).unwrap();
    }

    fn valid_yaml(id: &str) -> String {
        format!(
            r#"
id: {}
title: "Custom"
apiVersion: "1.0"
behavior:
  tone: casual
  style: short
template: "Q: {{{{query}}}} C: {{{{context}}}}"
output:
  format: text
"#,
            id
        )
    }

    #[test]
    fn test_builtins_load_without_workspace_files() {
        let temp_dir = TempDir::new().unwrap();

        let answer = load_prompt(temp_dir.path(), ANSWER_PROMPT_ID).unwrap();
        assert!(answer.template.contains("{{context}}"));
        assert!(answer.template.contains("{{query}}"));
        assert!(answer
            .system
            .as_deref()
            .is_some_and(|system| system.contains("Markdown bold")));

        let classify = load_prompt(temp_dir.path(), CLASSIFY_PROMPT_ID).unwrap();
        assert!(classify.template.contains("{{topics}}"));
        assert!(classify.template.contains("{{max_topics}}"));
    }

    #[test]
    fn test_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        write_override(temp_dir.path(), ANSWER_PROMPT_ID, &valid_yaml(ANSWER_PROMPT_ID));

        let prompt = load_prompt(temp_dir.path(), ANSWER_PROMPT_ID).unwrap();
        assert_eq!(prompt.title, "Custom");
        assert_eq!(prompt.template, "Q: {{query}} C: {{context}}");
    }

    #[test]
    fn test_override_with_wrong_id_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_override(temp_dir.path(), ANSWER_PROMPT_ID, &valid_yaml("something.else"));

        assert!(load_prompt(temp_dir.path(), ANSWER_PROMPT_ID).is_err());
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_override(temp_dir.path(), "invalid", "invalid: yaml: content:");

        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }
}
