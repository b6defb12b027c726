//! Lexical Search Engine.
//!
//! Scores corpus entries by token overlap with a free-text query. Token sets
//! for every entry are computed once when the engine is built; a search is a
//! pure read over those sets.
//!
//! # Scoring
//! Query and entry text are lowercased and split on non-alphanumeric
//! characters; tokens shorter than [`MIN_TOKEN_LEN`] are dropped. Each
//! distinct query token contributes the weight of the strongest field it
//! appears in:
//!
//! | field                                  | weight |
//! |----------------------------------------|--------|
//! | `title`, `question`                    | 3      |
//! | `tags`, `subcategory`, metadata values | 2      |
//! | `content`, `answer`                    | 1      |
//!
//! Entries scoring zero are dropped. Results are sorted by descending score
//! with ties kept in corpus order.

use crate::corpus::{Category, CategoryFilter, Corpus, KnowledgeEntry};
use crate::error::{AppError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 50;
pub const MIN_TOKEN_LEN: usize = 2;

const PRIMARY_WEIGHT: u32 = 3;
const TAG_WEIGHT: u32 = 2;
const BODY_WEIGHT: u32 = 1;

/// A validated search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub category: CategoryFilter,
    pub limit: usize,
}

impl SearchQuery {
    /// Build a query, clamping `limit` into `1..=MAX_LIMIT`.
    pub fn new(query: impl Into<String>, category: CategoryFilter, limit: i64) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "query cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            query,
            category,
            limit: clamp_limit(limit),
        })
    }
}

pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(1, MAX_LIMIT as i64) as usize
}

/// One ranked result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    #[serde(flatten)]
    pub entry: &'a KnowledgeEntry,
    pub score: u32,
    #[serde(rename = "matchedCategory")]
    pub matched_category: Category,
    /// Position of the entry in the corpus.
    #[serde(skip)]
    pub position: usize,
}

/// Per-entry token sets, one per weighted field group.
#[derive(Debug, Default)]
struct EntryTokens {
    primary: HashSet<String>,
    tags: HashSet<String>,
    body: HashSet<String>,
}

impl EntryTokens {
    fn build(entry: &KnowledgeEntry) -> Self {
        let mut tokens = EntryTokens::default();

        for field in [&entry.title, &entry.question].into_iter().flatten() {
            tokens.primary.extend(tokenize(field));
        }

        for tag in &entry.tags {
            tokens.tags.extend(tokenize(tag));
        }
        if let Some(sub) = &entry.subcategory {
            tokens.tags.extend(tokenize(sub));
        }
        for value in entry.metadata.values() {
            tokens.tags.extend(tokenize(value));
        }

        tokens.body.extend(tokenize(&entry.content));
        if let Some(answer) = &entry.answer {
            tokens.body.extend(tokenize(answer));
        }

        tokens
    }

    fn weight_of(&self, token: &str) -> u32 {
        if self.primary.contains(token) {
            PRIMARY_WEIGHT
        } else if self.tags.contains(token) {
            TAG_WEIGHT
        } else if self.body.contains(token) {
            BODY_WEIGHT
        } else {
            0
        }
    }

    fn score(&self, query_tokens: &[String]) -> u32 {
        query_tokens.iter().map(|t| self.weight_of(t)).sum()
    }
}

/// Lowercased word tokens in first-seen order, without duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(|t| t.to_lowercase())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Search engine over a shared, immutable corpus.
pub struct LexicalEngine {
    corpus: Arc<Corpus>,
    index: Vec<EntryTokens>,
}

impl LexicalEngine {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        let index = corpus.entries().iter().map(EntryTokens::build).collect();
        Self { corpus, index }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Score, filter, rank and truncate.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit<'_>> {
        let query_tokens = tokenize(&query.query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .corpus
            .entries()
            .iter()
            .zip(&self.index)
            .enumerate()
            .filter(|(_, (entry, _))| query.category.matches(entry.category))
            .filter_map(|(position, (entry, tokens))| {
                let score = tokens.score(&query_tokens);
                (score > 0).then_some(SearchHit {
                    entry,
                    score,
                    matched_category: entry.category,
                    position,
                })
            })
            .collect();

        // sort_by is stable: equal scores stay in corpus order.
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(query.limit);

        tracing::debug!(
            query = %query.query,
            category = query.category.as_str(),
            hits = hits.len(),
            "Lexical search completed"
        );

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(entries: Vec<KnowledgeEntry>) -> LexicalEngine {
        LexicalEngine::new(Arc::new(Corpus::from_entries(entries)))
    }

    fn query(q: &str, category: CategoryFilter, limit: i64) -> SearchQuery {
        SearchQuery::new(q, category, limit).unwrap()
    }

    fn fixture() -> Vec<KnowledgeEntry> {
        vec![
            KnowledgeEntry::new("t-1", Category::Training, "Badges reward progress.")
                .with_title("Badges"),
            KnowledgeEntry::new("qa-1", Category::Qa, "")
                .with_qa("What is gamification?", "Game elements in non-game contexts."),
            KnowledgeEntry::new("d-1", Category::Documents, "Notes on gamification ethics."),
            KnowledgeEntry::new("d-2", Category::Documents, "More gamification notes."),
            KnowledgeEntry::new("s-1", Category::Style, "Keep it short.")
                .with_subcategory("tone")
                .with_tags(["gamification"]),
        ]
    }

    #[test]
    fn test_tokenize_lowercases_and_dedupes() {
        assert_eq!(
            tokenize("What is Gamification? gamification!"),
            vec!["what", "is", "gamification"]
        );
    }

    #[test]
    fn test_tokenize_drops_short_tokens() {
        assert_eq!(tokenize("a b c ok"), vec!["ok"]);
        assert!(tokenize("  ,,, ").is_empty());
    }

    #[test]
    fn test_empty_query_rejected() {
        let err = SearchQuery::new("   ", CategoryFilter::All, 5).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(-7), 1);
        assert_eq!(clamp_limit(3), 3);
        assert_eq!(clamp_limit(10_000), MAX_LIMIT);
    }

    #[test]
    fn test_qa_scenario_returns_question_first() {
        let engine = engine(fixture());
        let hits = engine.search(&query("gamification", CategoryFilter::Only(Category::Qa), 5));

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.id, "qa-1");
        assert!(hits[0].score > 0);
        assert_eq!(hits[0].matched_category, Category::Qa);
    }

    #[test]
    fn test_field_weights_order_results() {
        let engine = engine(fixture());
        let hits = engine.search(&query("gamification", CategoryFilter::All, 10));

        let ids: Vec<&str> = hits.iter().map(|h| h.entry.id.as_str()).collect();
        // question (3) > tag (2) > body (1, corpus order)
        assert_eq!(ids, vec!["qa-1", "s-1", "d-1", "d-2"]);
        let scores: Vec<u32> = hits.iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![3, 2, 1, 1]);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let entries = (0..6)
            .map(|i| KnowledgeEntry::new(format!("e-{}", i), Category::Documents, "leaderboard"))
            .collect();
        let engine = engine(entries);
        let hits = engine.search(&query("leaderboard", CategoryFilter::All, 4));

        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_results_bounded_and_sorted() {
        let engine = LexicalEngine::new(Arc::new(Corpus::embedded().unwrap()));
        for limit in [1, 2, 5, 50] {
            let hits = engine.search(&query("hexad motivation rewards", CategoryFilter::All, limit));
            assert!(hits.len() <= limit as usize);
            assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
            assert!(hits
                .windows(2)
                .all(|w| w[0].score > w[1].score || w[0].position < w[1].position));
        }
    }

    #[test]
    fn test_no_match_returns_empty() {
        let engine = engine(fixture());
        let hits = engine.search(&query("zebra xylophone", CategoryFilter::All, 5));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_all_is_superset_of_specific_category() {
        let engine = engine(fixture());
        let all = engine.search(&query("notes gamification", CategoryFilter::All, 50));
        for category in Category::ALL {
            let specific = engine.search(&query(
                "notes gamification",
                CategoryFilter::Only(category),
                50,
            ));
            for hit in specific {
                assert!(all.iter().any(|h| h.entry.id == hit.entry.id));
            }
        }
    }

    #[test]
    fn test_metadata_values_are_boosted() {
        let entries = vec![
            KnowledgeEntry::new("a", Category::Documents, "marczewski wrote this"),
            KnowledgeEntry::new("b", Category::Documents, "unrelated")
                .with_metadata("source", "marczewski"),
        ];
        let engine = engine(entries);
        let hits = engine.search(&query("marczewski", CategoryFilter::All, 5));
        assert_eq!(hits[0].entry.id, "b");
        assert_eq!(hits[0].score, TAG_WEIGHT);
    }
}
