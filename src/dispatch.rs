//! Dispatcher: validates a tool call, runs its handler and normalizes the
//! outcome into a [`ToolResultEnvelope`] or a dispatch fault.
//!
//! # Failure tiers
//! - `search_internet`, `search_gamified_sites` and `scrape_gamified_content`
//!   report handler failures as a successful envelope whose text starts with
//!   `Error:` (soft failure).
//! - `InvalidArgument` and `MethodNotFound` are returned as-is for every tool.
//! - Any other handler failure becomes `InternalError`.

use crate::config::CredentialSource;
use crate::corpus::CategoryFilter;
use crate::error::{AppError, Result};
use crate::search::{get_writing_style, LexicalEngine, SearchQuery, DEFAULT_LIMIT};
use crate::tools::{
    ToolCallEnvelope, ToolRegistry, ToolResultEnvelope, GET_WRITING_STYLE,
    SCRAPE_GAMIFIED_CONTENT, SEARCH_GAMIFIED_SITES, SEARCH_INTERNET, SEARCH_RAG_KNOWLEDGE,
};
use crate::web::search::format_results;
use crate::web::{scrape, web_search, ExtractType, GamifiedDomain, HtmlExtractor, HttpFetcher};
use serde_json::{json, Map, Value};
use std::time::Instant;
use tracing::Instrument;

/// Tools whose failures are reported as content.
pub const SOFT_FAILURE_TOOLS: [&str; 3] =
    [SEARCH_INTERNET, SEARCH_GAMIFIED_SITES, SCRAPE_GAMIFIED_CONTENT];

pub fn is_soft_failure_tool(name: &str) -> bool {
    SOFT_FAILURE_TOOLS.contains(&name)
}

/// Per-request dispatcher over shared, read-only components.
pub struct Dispatcher<'a> {
    engine: &'a LexicalEngine,
    registry: &'a ToolRegistry,
    fetcher: &'a dyn HttpFetcher,
    extractor: &'a HtmlExtractor,
    credentials: &'a CredentialSource,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        engine: &'a LexicalEngine,
        registry: &'a ToolRegistry,
        fetcher: &'a dyn HttpFetcher,
        extractor: &'a HtmlExtractor,
        credentials: &'a CredentialSource,
    ) -> Self {
        Self {
            engine,
            registry,
            fetcher,
            extractor,
            credentials,
        }
    }

    /// Run one tool call.
    pub async fn invoke(&self, call: &ToolCallEnvelope) -> Result<ToolResultEnvelope> {
        let call_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("tool_call", %call_id, tool = %call.name);

        async move {
            let start = Instant::now();
            let result = self.invoke_inner(call).await;

            let outcome = match &result {
                Ok(Outcome::Success(_)) => "success",
                Ok(Outcome::SoftFailure(_)) => "soft_failure",
                Err(_) => "fault",
            };
            let elapsed_ms = start.elapsed().as_millis() as u64;

            metrics::counter!("tool_calls_total", "tool" => call.name.clone(), "outcome" => outcome)
                .increment(1);
            metrics::histogram!("tool_call_latency_ms").record(elapsed_ms as f64);

            match result {
                Ok(Outcome::Success(text)) => {
                    tracing::info!(elapsed_ms, "Tool call completed");
                    Ok(ToolResultEnvelope::text(text))
                }
                Ok(Outcome::SoftFailure(message)) => {
                    tracing::warn!(elapsed_ms, error = %message, "Tool reported failure as content");
                    Ok(ToolResultEnvelope::text(format!("Error: {}", message)))
                }
                Err(err) => {
                    tracing::warn!(elapsed_ms, error = %err, "Tool call faulted");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn invoke_inner(&self, call: &ToolCallEnvelope) -> Result<Outcome> {
        self.registry.validate(&call.name, &call.arguments)?;
        let args = &call.arguments;

        let handled = match call.name.as_str() {
            SEARCH_RAG_KNOWLEDGE => self.search_rag_knowledge(args),
            GET_WRITING_STYLE => self.get_writing_style(args),
            SEARCH_INTERNET => self.search_internet(args).await,
            SEARCH_GAMIFIED_SITES => self.search_gamified_sites(args).await,
            SCRAPE_GAMIFIED_CONTENT => self.scrape_gamified_content(args).await,
            // Registered but without a handler.
            other => Err(AppError::InternalError(format!(
                "no handler registered for tool '{}'",
                other
            ))),
        };

        match handled {
            Ok(text) => Ok(Outcome::Success(text)),
            Err(err @ (AppError::InvalidArgument(_) | AppError::MethodNotFound(_))) => Err(err),
            Err(err) if is_soft_failure_tool(&call.name) => Ok(Outcome::SoftFailure(err.to_string())),
            Err(AppError::InternalError(msg)) => Err(AppError::InternalError(msg)),
            Err(err) => Err(AppError::InternalError(err.to_string())),
        }
    }

    fn search_rag_knowledge(&self, args: &Map<String, Value>) -> Result<String> {
        let query = required_str(args, "query")?;
        let category: CategoryFilter = optional_str(args, "category")
            .unwrap_or("all")
            .parse()
            .map_err(AppError::InvalidArgument)?;
        let limit = optional_int(args, "limit")?.unwrap_or(DEFAULT_LIMIT as i64);

        let search = SearchQuery::new(query, category, limit)?;
        let hits = self.engine.search(&search);

        let payload = json!({
            "query": search.query,
            "category": category.as_str(),
            "total": hits.len(),
            "results": hits,
        });
        Ok(serde_json::to_string_pretty(&payload)?)
    }

    fn get_writing_style(&self, args: &Map<String, Value>) -> Result<String> {
        let category = optional_str(args, "category");
        let guidelines = get_writing_style(self.engine.corpus(), category);

        let payload = json!({
            "category": category.map(str::trim).filter(|c| !c.is_empty()).unwrap_or("all"),
            "total": guidelines.len(),
            "guidelines": guidelines,
        });
        Ok(serde_json::to_string_pretty(&payload)?)
    }

    async fn search_internet(&self, args: &Map<String, Value>) -> Result<String> {
        let query = required_str(args, "query")?;
        let site = optional_str(args, "site");

        let results = web_search(self.fetcher, self.credentials.resolve(), query, site).await?;

        let heading = match site.map(str::trim).filter(|s| !s.is_empty()) {
            Some(site) => format!("{} (site: {})", query, site),
            None => query.to_string(),
        };
        Ok(format_results(&heading, &results))
    }

    async fn search_gamified_sites(&self, args: &Map<String, Value>) -> Result<String> {
        let query = required_str(args, "query")?;
        let domain: GamifiedDomain = optional_str(args, "domain").unwrap_or("both").parse()?;

        let clause = domain.site_clause();
        let results =
            web_search(self.fetcher, self.credentials.resolve(), query, Some(&clause)).await?;

        Ok(format_results(
            &format!("{} (domain: {})", query, domain.label()),
            &results,
        ))
    }

    async fn scrape_gamified_content(&self, args: &Map<String, Value>) -> Result<String> {
        let url = required_str(args, "url")?;
        let extract_type: ExtractType = optional_str(args, "extract_type").unwrap_or("text").parse()?;

        scrape::scrape(self.fetcher, self.extractor, url, extract_type).await
    }
}

/// Handler result before envelope assembly.
enum Outcome {
    Success(String),
    SoftFailure(String),
}

fn required_str<'v>(args: &'v Map<String, Value>, name: &str) -> Result<&'v str> {
    optional_str(args, name)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidArgument(format!("'{}' is required", name)))
}

fn optional_str<'v>(args: &'v Map<String, Value>, name: &str) -> Option<&'v str> {
    args.get(name).and_then(|v| v.as_str())
}

/// Integer argument; accepts JSON numbers and numeric strings.
fn optional_int(args: &Map<String, Value>, name: &str) -> Result<Option<i64>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| AppError::InvalidArgument(format!("'{}' must be an integer", name))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::InvalidArgument(format!("'{}' must be an integer", name))),
        Some(_) => Err(AppError::InvalidArgument(format!(
            "'{}' must be an integer",
            name
        ))),
    }
}
