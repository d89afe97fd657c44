//! Directory-backed corpus of topic documents.
//!
//! Every failure here is soft: an unreadable directory lists as empty and an
//! unreadable document reads as empty text. Both are logged.

use crate::types::{Topic, TopicMeta};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Flat listing of topic documents in one directory.
#[derive(Debug, Clone)]
pub struct CorpusCatalog {
    root: PathBuf,
    extensions: Vec<String>,
}

impl CorpusCatalog {
    /// Create a catalog over `root`, recognizing the given extensions (without dots).
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate topic documents, sorted by identifier.
    ///
    /// Subdirectories and hidden files are ignored. When two files share a
    /// stem (`algebra.md`, `algebra.txt`) the first in filename order wins.
    pub fn list(&self) -> Vec<TopicMeta> {
        if !self.root.is_dir() {
            tracing::warn!(root = ?self.root, "Corpus directory is missing or unreadable");
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut topics = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(root = ?self.root, "Skipping corpus entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(identifier) = self.identifier_for(path) else {
                continue;
            };

            if !seen.insert(identifier.clone()) {
                tracing::warn!(
                    identifier = %identifier,
                    path = ?path,
                    "Duplicate topic identifier, keeping the first file"
                );
                continue;
            }

            topics.push(TopicMeta {
                identifier,
                source: path.to_path_buf(),
            });
        }

        topics.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        tracing::debug!(root = ?self.root, count = topics.len(), "Listed corpus");
        topics
    }

    /// Load a topic's content. Unreadable files yield empty content.
    pub fn read(&self, meta: &TopicMeta) -> Topic {
        let content = match std::fs::read(&meta.source) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!(
                    identifier = %meta.identifier,
                    path = ?meta.source,
                    "Failed to read topic document: {}",
                    e
                );
                String::new()
            }
        };

        Topic {
            identifier: meta.identifier.clone(),
            byte_size: content.len(),
            content,
        }
    }

    /// Identifier for a recognized document, `None` for anything else.
    fn identifier_for(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        if file_name.starts_with('.') {
            return None;
        }

        let extension = path.extension()?.to_str()?.to_lowercase();
        if !self.extensions.contains(&extension) {
            return None;
        }

        let stem = path.file_stem()?.to_str()?.trim();
        if stem.is_empty() {
            return None;
        }

        Some(stem.to_string())
    }
}
