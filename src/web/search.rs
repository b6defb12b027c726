//! Google Programmable Search client used by `search_internet` and
//! `search_gamified_sites`.

use crate::config::{SearchCredentials, SEARCH_API_KEY_VAR, SEARCH_ENGINE_ID_VAR};
use crate::error::{AppError, Result};
use crate::web::fetch::HttpFetcher;
use reqwest::Url;
use serde::Deserialize;
use std::str::FromStr;

pub const SEARCH_API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Results requested per search.
const RESULTS_PER_QUERY: u8 = 5;

pub const GAMIFIED_UK: &str = "gamified.uk";
pub const MARCZEWSKI: &str = "marczewski.me.uk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Which gamification site(s) `search_gamified_sites` covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamifiedDomain {
    GamifiedUk,
    Marczewski,
    #[default]
    Both,
}

impl GamifiedDomain {
    /// Search-operator clause restricting results to the domain(s).
    pub fn site_clause(&self) -> String {
        match self {
            GamifiedDomain::GamifiedUk => format!("site:{}", GAMIFIED_UK),
            GamifiedDomain::Marczewski => format!("site:{}", MARCZEWSKI),
            GamifiedDomain::Both => format!("(site:{} OR site:{})", GAMIFIED_UK, MARCZEWSKI),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GamifiedDomain::GamifiedUk => GAMIFIED_UK,
            GamifiedDomain::Marczewski => MARCZEWSKI,
            GamifiedDomain::Both => "both",
        }
    }
}

impl FromStr for GamifiedDomain {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "both" => Ok(GamifiedDomain::Both),
            GAMIFIED_UK => Ok(GamifiedDomain::GamifiedUk),
            MARCZEWSKI => Ok(GamifiedDomain::Marczewski),
            other => Err(AppError::InvalidArgument(format!(
                "domain must be one of {}, {}, both (got '{}')",
                GAMIFIED_UK, MARCZEWSKI, other
            ))),
        }
    }
}

/// Error text used when either credential is absent.
pub fn missing_credentials_message() -> String {
    format!(
        "Missing search API credentials: set {} and {} to enable web search",
        SEARCH_API_KEY_VAR, SEARCH_ENGINE_ID_VAR
    )
}

/// Build the request URL for `query`, appending `site:` when given.
pub fn build_search_url(
    credentials: &SearchCredentials,
    query: &str,
    site: Option<&str>,
) -> Result<Url> {
    let q = match site.map(str::trim).filter(|s| !s.is_empty()) {
        Some(site) if site.starts_with("site:") || site.starts_with('(') => {
            format!("{} {}", query, site)
        }
        Some(site) => format!("{} site:{}", query, site),
        None => query.to_string(),
    };

    let num = RESULTS_PER_QUERY.to_string();
    Url::parse_with_params(
        SEARCH_API_URL,
        &[
            ("key", credentials.api_key.as_str()),
            ("cx", credentials.engine_id.as_str()),
            ("q", q.as_str()),
            ("num", num.as_str()),
        ],
    )
    .map_err(|e| AppError::InternalError(format!("Invalid search URL: {}", e)))
}

/// Run one search against the API.
///
/// Missing credentials, transport errors, non-2xx statuses and undecodable
/// bodies are all [`AppError::CollaboratorFailure`].
pub async fn web_search(
    fetcher: &dyn HttpFetcher,
    credentials: Option<SearchCredentials>,
    query: &str,
    site: Option<&str>,
) -> Result<Vec<WebResult>> {
    let credentials =
        credentials.ok_or_else(|| AppError::CollaboratorFailure(missing_credentials_message()))?;

    let url = build_search_url(&credentials, query, site)?;
    let response = fetcher
        .fetch(url.as_str(), &[("Accept", "application/json")])
        .await?;

    if !response.is_success() {
        let detail = serde_json::from_str::<ApiErrorBody>(&response.body)
            .map(|b| b.error.message)
            .unwrap_or_default();
        return Err(AppError::CollaboratorFailure(format!(
            "Search API returned status {}{}",
            response.status,
            if detail.is_empty() {
                String::new()
            } else {
                format!(": {}", detail)
            }
        )));
    }

    let parsed: SearchResponse = serde_json::from_str(&response.body).map_err(|e| {
        AppError::CollaboratorFailure(format!("Malformed search API response: {}", e))
    })?;

    Ok(parsed
        .items
        .into_iter()
        .map(|item| WebResult {
            title: item.title,
            link: item.link,
            snippet: item.snippet.replace('\n', " "),
        })
        .collect())
}

/// Render results as a numbered plain-text list.
pub fn format_results(heading: &str, results: &[WebResult]) -> String {
    if results.is_empty() {
        return format!("No results found for: {}", heading);
    }

    let mut out = format!("Search results for: {}\n", heading);
    for (i, r) in results.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {}\n   {}\n   {}\n",
            i + 1,
            r.title,
            r.link,
            r.snippet
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> SearchCredentials {
        SearchCredentials::new("k3y", "engine").unwrap()
    }

    #[test]
    fn test_search_url_carries_credentials_and_site() {
        let url = build_search_url(&creds(), "hexad", Some("gamified.uk")).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(url.as_str().starts_with(SEARCH_API_URL));
        assert!(pairs.contains(&("key".into(), "k3y".into())));
        assert!(pairs.contains(&("cx".into(), "engine".into())));
        assert!(pairs.contains(&("q".into(), "hexad site:gamified.uk".into())));
    }

    #[test]
    fn test_search_url_without_site() {
        let url = build_search_url(&creds(), "badges", None).unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "q" && v == "badges"));
    }

    #[test]
    fn test_domain_clauses() {
        assert_eq!(GamifiedDomain::GamifiedUk.site_clause(), "site:gamified.uk");
        assert_eq!(
            GamifiedDomain::Both.site_clause(),
            "(site:gamified.uk OR site:marczewski.me.uk)"
        );
        assert_eq!("".parse::<GamifiedDomain>().unwrap(), GamifiedDomain::Both);
        assert!("example.com".parse::<GamifiedDomain>().is_err());
    }

    #[test]
    fn test_clause_site_is_not_prefixed_twice() {
        let clause = GamifiedDomain::Both.site_clause();
        let url = build_search_url(&creds(), "quests", Some(&clause)).unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "q"
            && v == "quests (site:gamified.uk OR site:marczewski.me.uk)"));
    }

    #[test]
    fn test_format_results() {
        let text = format_results(
            "hexad",
            &[WebResult {
                title: "Hexad".into(),
                link: "https://gamified.uk/hexad".into(),
                snippet: "Six user types".into(),
            }],
        );
        assert!(text.contains("1. Hexad"));
        assert!(text.contains("https://gamified.uk/hexad"));
        assert_eq!(format_results("nothing", &[]), "No results found for: nothing");
    }

    #[test]
    fn test_missing_credentials_message_names_variables() {
        let msg = missing_credentials_message();
        assert!(msg.contains("GOOGLE_API_KEY"));
        assert!(msg.contains("GOOGLE_SEARCH_ENGINE_ID"));
        assert!(msg.to_lowercase().contains("credentials"));
    }
}
