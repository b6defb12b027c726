//! Tool Registry and the tool-call envelope types.
//!
//! The registry is configuration data: built once at startup and shared
//! read-only by every request.

pub mod registry;
pub mod types;

pub use registry::{
    ToolRegistry, GET_WRITING_STYLE, SCRAPE_GAMIFIED_CONTENT,
    SEARCH_GAMIFIED_SITES, SEARCH_INTERNET, SEARCH_RAG_KNOWLEDGE,
};
pub use types::{ContentItem, ToolCallEnvelope, ToolDescriptor, ToolResultEnvelope};
