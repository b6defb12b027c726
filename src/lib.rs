//! Gamified RAG - tool-call server over an embedded knowledge base
//!
//! This library exposes the corpus, search, tool registry, dispatcher and
//! HTTP handlers, enabling integration tests and embedding in other services.

pub mod config;
pub mod corpus;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod search;
pub mod state;
pub mod tools;
pub mod web;

// Re-export key types for convenience
pub use config::{Config, CredentialSource, SearchCredentials};
pub use corpus::{Category, CategoryFilter, Corpus, KnowledgeEntry};
pub use dispatch::Dispatcher;
pub use error::{AppError, Result};
pub use handlers::{build_router, health_handler, ready_handler, rpc_handler, status_handler};
pub use search::{get_writing_style, LexicalEngine, SearchQuery};
pub use state::AppState;
pub use tools::{ToolCallEnvelope, ToolDescriptor, ToolRegistry, ToolResultEnvelope};
pub use web::{HttpFetcher, ReqwestFetcher};
