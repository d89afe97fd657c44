//! Grounding context assembly.
//!
//! Layout of an assembled context:
//!
//! ```text
//! ### TOPIC: Biology
//! <content>
//!
//! ==========
//!
//! ### TOPIC: ChemistryBasics
//! <content>
//! ```

use crate::catalog::CorpusCatalog;
use crate::types::Selection;

/// Context used when the corpus holds no documents.
pub const NO_MATERIAL_PLACEHOLDER: &str =
    "(No reference material is registered. Answer from general knowledge.)";

/// Prefix of the header line that opens each topic section.
pub const TOPIC_HEADER_PREFIX: &str = "### TOPIC: ";

/// Separator placed between topic sections.
pub const SECTION_SEPARATOR: &str = "\n\n==========\n\n";

/// Characters kept from each topic when classification matched nothing.
pub const FALLBACK_EXCERPT_CHARS: usize = 500;

/// Appended to every fallback excerpt.
pub const ELLIPSIS_MARKER: &str = "...";

/// Cut `content` to its first `max_chars` characters and append [`ELLIPSIS_MARKER`].
pub fn truncate_excerpt(content: &str, max_chars: usize) -> String {
    let mut excerpt: String = content.chars().take(max_chars).collect();
    excerpt.push_str(ELLIPSIS_MARKER);
    excerpt
}

/// Render `(identifier, content)` sections into one context string.
pub fn render_sections(sections: &[(String, String)]) -> String {
    if sections.is_empty() {
        return NO_MATERIAL_PLACEHOLDER.to_string();
    }

    sections
        .iter()
        .map(|(identifier, content)| format!("{}{}\n{}", TOPIC_HEADER_PREFIX, identifier, content))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Read the selected topics and assemble the grounding context.
///
/// Fallback selections are cut to [`FALLBACK_EXCERPT_CHARS`] per topic;
/// every other mode includes content in full.
pub fn build_context(selection: &Selection, catalog: &CorpusCatalog) -> String {
    let sections: Vec<(String, String)> = selection
        .topics
        .iter()
        .map(|meta| {
            let topic = catalog.read(meta);
            let content = if selection.mode.truncates() {
                truncate_excerpt(&topic.content, FALLBACK_EXCERPT_CHARS)
            } else {
                topic.content
            };
            (topic.identifier, content)
        })
        .collect();

    let context = render_sections(&sections);
    tracing::debug!(
        mode = ?selection.mode,
        topics = sections.len(),
        chars = context.chars().count(),
        "Assembled grounding context"
    );
    context
}

/// Split an assembled context back into `(identifier, content)` pairs.
///
/// Sections are split where the separator is directly followed by a topic
/// header, so a document may itself contain the separator line. The
/// placeholder, or any text not opening with a topic header, yields no
/// sections.
pub fn parse_context(context: &str) -> Vec<(String, String)> {
    let Some(body) = context.strip_prefix(TOPIC_HEADER_PREFIX) else {
        return Vec::new();
    };
    let boundary = format!("{}{}", SECTION_SEPARATOR, TOPIC_HEADER_PREFIX);

    body.split(boundary.as_str())
        .map(|section| match section.split_once('\n') {
            Some((identifier, content)) => (identifier.to_string(), content.to_string()),
            None => (section.to_string(), String::new()),
        })
        .collect()
}
