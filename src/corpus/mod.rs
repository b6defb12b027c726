//! Corpus Store: the fixed, read-only knowledge base.
//!
//! A [`Corpus`] is built once at startup, either from the embedded default
//! document or from a file named by `CORPUS_PATH`, and is shared behind an
//! `Arc` for the life of the process. Nothing mutates it after construction.

pub mod loader;
pub mod types;

pub use loader::{parse_entries, EMBEDDED_CORPUS};
pub use types::{Category, CategoryFilter, KnowledgeEntry};

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Length of the hex fingerprint reported as the corpus version.
const VERSION_HEX_LEN: usize = 16;

#[derive(Debug)]
pub struct Corpus {
    entries: Vec<KnowledgeEntry>,
    loaded_at: DateTime<Utc>,
    version: String,
}

/// Summary block reported by the status endpoint.
#[derive(Debug, Serialize)]
pub struct CorpusSummary {
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    pub version: String,
    #[serde(rename = "loadedAt")]
    pub loaded_at: DateTime<Utc>,
    pub categories: BTreeMap<Category, usize>,
}

impl Corpus {
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        let version = Self::compute_version(&entries);
        Self {
            entries,
            loaded_at: Utc::now(),
            version,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_entries(parse_entries(json)?))
    }

    /// The corpus compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CORPUS)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::CorpusError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Embedded corpus unless a path is given.
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self> {
        let corpus = match path {
            Some(p) => Self::load(p)?,
            None => Self::embedded()?,
        };

        let source = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string());
        tracing::info!(
            total_items = corpus.total_items(),
            version = %corpus.version,
            source = %source,
            "Corpus loaded"
        );

        Ok(corpus)
    }

    /// SHA-256 over the serialized entries, truncated to a short hex id.
    ///
    /// Identical entry lists always share a version.
    pub fn compute_version(entries: &[KnowledgeEntry]) -> String {
        let mut hasher = Sha256::new();

        for entry in entries {
            // Serializing plain strings and BTreeMaps cannot fail.
            if let Ok(bytes) = serde_json::to_vec(entry) {
                hasher.update(&bytes);
            }
            hasher.update(b"\n");
        }

        let digest = format!("{:x}", hasher.finalize());
        digest[..VERSION_HEX_LEN].to_string()
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn total_items(&self) -> usize {
        self.entries.len()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Entries of one category, in corpus order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn summary(&self) -> CorpusSummary {
        let mut categories: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();
        for entry in &self.entries {
            *categories.entry(entry.category).or_default() += 1;
        }

        CorpusSummary {
            total_items: self.total_items(),
            version: self.version.clone(),
            loaded_at: self.loaded_at,
            categories,
        }
    }
}
