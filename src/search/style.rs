//! Style Retrieval: read path over `style` entries.

use crate::corpus::{Category, Corpus, KnowledgeEntry};
use serde::Serialize;

/// A writing-style guideline as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct StyleGuideline<'a> {
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    pub guideline: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub tags: &'a [String],
}

impl<'a> From<&'a KnowledgeEntry> for StyleGuideline<'a> {
    fn from(entry: &'a KnowledgeEntry) -> Self {
        Self {
            id: &entry.id,
            category: entry.subcategory.as_deref(),
            title: entry.title.as_deref(),
            guideline: &entry.content,
            tags: &entry.tags,
        }
    }
}

/// Style entries in corpus order, optionally restricted to one sub-category.
///
/// A missing or blank `category` returns every style entry. Matching is
/// exact and case-insensitive; an unknown sub-category yields an empty list.
pub fn get_writing_style<'a>(corpus: &'a Corpus, category: Option<&str>) -> Vec<StyleGuideline<'a>> {
    let wanted = category.map(str::trim).filter(|c| !c.is_empty());

    corpus
        .by_category(Category::Style)
        .filter(|entry| match wanted {
            None => true,
            Some(w) => entry
                .subcategory
                .as_deref()
                .is_some_and(|sub| sub.eq_ignore_ascii_case(w)),
        })
        .map(StyleGuideline::from)
        .collect()
}
