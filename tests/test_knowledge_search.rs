//! Integration tests for knowledge retrieval over a file-backed corpus.
//!
//! The corpus is written to a temp file and loaded the same way the server
//! loads `CORPUS_PATH`.

use gamified_rag::{
    get_writing_style, AppState, Category, CategoryFilter, Config, Corpus, LexicalEngine,
    SearchQuery, ToolCallEnvelope,
};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn corpus_file() -> NamedTempFile {
    let corpus = json!({
        "training": [
            { "id": "t-leaderboards", "title": "Leaderboards", "content": "Rank users by points." },
            { "id": "t-quests", "title": "Quests", "content": "Leaderboards are not quests." }
        ],
        "style": [
            { "id": "s-tone", "subcategory": "tone", "content": "Friendly and direct." },
            { "id": "s-structure", "subcategory": "structure", "content": "Short sections." }
        ],
        "qa": [
            { "id": "qa-gamification", "question": "What is gamification?", "answer": "Game elements in non-game contexts." }
        ],
        "documents": [
            { "id": "d-1", "content": "Leaderboards motivate some players." },
            { "id": "d-2", "content": "Leaderboards demotivate others." }
        ]
    });

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", corpus).unwrap();
    file
}

fn engine() -> (NamedTempFile, LexicalEngine) {
    let file = corpus_file();
    let corpus = Corpus::load(file.path()).unwrap();
    (file, LexicalEngine::new(Arc::new(corpus)))
}

fn ids(engine: &LexicalEngine, q: &str, category: CategoryFilter, limit: i64) -> Vec<String> {
    engine
        .search(&SearchQuery::new(q, category, limit).unwrap())
        .iter()
        .map(|h| h.entry.id.clone())
        .collect()
}

#[test]
fn test_total_items_matches_file() {
    let file = corpus_file();
    let corpus = Corpus::load(file.path()).unwrap();
    assert_eq!(corpus.total_items(), 7);
    assert_eq!(corpus.summary().total_items, corpus.entries().len());
}

#[test]
fn test_ranking_is_deterministic() {
    let (_file, engine) = engine();
    let first = ids(&engine, "leaderboards", CategoryFilter::All, 10);
    for _ in 0..5 {
        assert_eq!(ids(&engine, "leaderboards", CategoryFilter::All, 10), first);
    }
    // title match first, then body matches in corpus order
    assert_eq!(first, vec!["t-leaderboards", "t-quests", "d-1", "d-2"]);
}

#[test]
fn test_category_filter_and_limit() {
    let (_file, engine) = engine();
    assert_eq!(
        ids(&engine, "leaderboards", CategoryFilter::Only(Category::Documents), 1),
        vec!["d-1"]
    );
    assert!(ids(&engine, "leaderboards", CategoryFilter::Only(Category::Qa), 5).is_empty());
}

#[test]
fn test_negative_limit_clamps_to_one() {
    let (_file, engine) = engine();
    assert_eq!(ids(&engine, "leaderboards", CategoryFilter::All, -3).len(), 1);
}

#[test]
fn test_style_retrieval_from_file() {
    let file = corpus_file();
    let corpus = Corpus::load(file.path()).unwrap();

    let all: Vec<&str> = get_writing_style(&corpus, None).iter().map(|g| g.id).collect();
    assert_eq!(all, vec!["s-tone", "s-structure"]);
    assert!(get_writing_style(&corpus, Some("nonexistent")).is_empty());
}

#[tokio::test]
async fn test_state_loads_corpus_path() {
    let file = corpus_file();
    let config = Config {
        corpus_path: Some(file.path().to_path_buf()),
        ..Config::default()
    };
    let state = AppState::new(config).unwrap();
    assert_eq!(state.corpus.total_items(), 7);

    let envelope = state
        .dispatcher()
        .invoke(&ToolCallEnvelope::new(
            "search_rag_knowledge",
            json!({ "query": "gamification", "category": "qa" }),
        ))
        .await
        .unwrap();

    let payload: Value = serde_json::from_str(&envelope.joined_text()).unwrap();
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["results"][0]["id"], "qa-gamification");
}

#[test]
fn test_malformed_corpus_file_fails_startup() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[1, 2, 3]").unwrap();

    let config = Config {
        corpus_path: Some(file.path().to_path_buf()),
        ..Config::default()
    };
    assert!(AppState::new(config).is_err());
}
