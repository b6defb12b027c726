//! External web collaborators: outbound fetch, web search and scraping.
//!
//! Everything here talks to the network through [`HttpFetcher`], so tests
//! can substitute a recording fake.

pub mod fetch;
pub mod html;
pub mod scrape;
pub mod search;

pub use fetch::{FetchResponse, HttpFetcher, ReqwestFetcher};
pub use html::HtmlExtractor;
pub use scrape::{check_allowed, is_allowed_url, ExtractType, ALLOWED_DOMAINS, MAX_LINKS, MAX_TEXT_CHARS};
pub use search::{web_search, GamifiedDomain, WebResult};
