//! Topics command handler.

use clap::Args;
use databank_core::{config::AppConfig, AppResult};
use databank_knowledge::CorpusCatalog;
use serde::Serialize;

/// List the topic documents in the corpus
#[derive(Args, Debug)]
pub struct TopicsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TopicRow {
    identifier: String,
    bytes: usize,
    source: String,
}

impl TopicsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let catalog = CorpusCatalog::new(config.materials_path(), &config.extensions);
        let rows = collect_rows(&catalog);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No topics found in {}", catalog.root().display());
            return Ok(());
        }

        let width = rows.iter().map(|r| r.identifier.len()).max().unwrap_or(0);
        for row in &rows {
            println!("{:<width$}  {:>8} bytes", row.identifier, row.bytes, width = width);
        }
        println!("\n{} topic(s) in {}", rows.len(), catalog.root().display());

        Ok(())
    }
}

fn collect_rows(catalog: &CorpusCatalog) -> Vec<TopicRow> {
    catalog
        .list()
        .iter()
        .map(|meta| {
            let topic = catalog.read(meta);
            TopicRow {
                identifier: topic.identifier,
                bytes: topic.byte_size,
                source: meta.source.display().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rows_follow_catalog_order() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Physics.md"), "F = ma").unwrap();
        std::fs::write(temp.path().join("Biology.txt"), "Cells").unwrap();
        std::fs::write(temp.path().join("notes.csv"), "ignored").unwrap();

        let catalog = CorpusCatalog::new(temp.path(), &["md".to_string(), "txt".to_string()]);
        let rows = collect_rows(&catalog);

        let ids: Vec<_> = rows.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["Biology", "Physics"]);
        assert_eq!(rows[1].bytes, 6);
    }
}
