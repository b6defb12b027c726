//! Corpus parsing from the sectioned JSON format.
//!
//! The file groups entries by category:
//!
//! ```json
//! { "training": [...], "style": [...], "qa": [...], "documents": [...] }
//! ```
//!
//! Sections are flattened in that order; entry order inside a section is
//! preserved, which fixes the tie-break order used by search.

use crate::corpus::types::{Category, KnowledgeEntry};
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Embedded default corpus.
pub const EMBEDDED_CORPUS: &str = include_str!("default_corpus.json");

#[derive(Debug, Default, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    training: Vec<RawEntry>,
    #[serde(default)]
    style: Vec<RawEntry>,
    #[serde(default)]
    qa: Vec<RawEntry>,
    #[serde(default)]
    documents: Vec<RawEntry>,
}

/// An entry as written in the file; the category comes from its section.
#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<String>,
    title: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, alias = "text")]
    content: String,
    subcategory: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

/// Parse a sectioned corpus document into an ordered entry list.
///
/// Entries without an `id` get `"<category>-<n>"` (1-based within the section).
/// Entries with no searchable text at all are logged and skipped.
pub fn parse_entries(json: &str) -> Result<Vec<KnowledgeEntry>> {
    let file: CorpusFile = serde_json::from_str(json)
        .map_err(|e| AppError::CorpusError(format!("Invalid corpus JSON: {}", e)))?;

    let sections = [
        (Category::Training, file.training),
        (Category::Style, file.style),
        (Category::Qa, file.qa),
        (Category::Documents, file.documents),
    ];

    let mut entries = Vec::new();
    for (category, raw_entries) in sections {
        for (idx, raw) in raw_entries.into_iter().enumerate() {
            let id = raw
                .id
                .clone()
                .unwrap_or_else(|| format!("{}-{}", category, idx + 1));

            if is_blank(&raw) {
                tracing::warn!(id = %id, category = %category, "Skipping empty corpus entry");
                continue;
            }

            entries.push(KnowledgeEntry {
                id,
                category,
                title: raw.title,
                question: raw.question,
                answer: raw.answer,
                content: raw.content,
                subcategory: raw.subcategory,
                tags: raw.tags,
                metadata: raw.metadata,
            });
        }
    }

    Ok(entries)
}

fn is_blank(raw: &RawEntry) -> bool {
    [&raw.title, &raw.question, &raw.answer]
        .iter()
        .all(|f| f.as_deref().map_or(true, |s| s.trim().is_empty()))
        && raw.content.trim().is_empty()
}
