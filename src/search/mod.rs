//! Knowledge retrieval over the in-memory corpus.

pub mod lexical;
pub mod style;

pub use lexical::{clamp_limit, tokenize, LexicalEngine, SearchHit, SearchQuery, DEFAULT_LIMIT};
pub use style::{get_writing_style, StyleGuideline};
