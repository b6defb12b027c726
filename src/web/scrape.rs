//! Allow-listed page scraping for `scrape_gamified_content`.

use crate::error::{AppError, Result};
use crate::web::fetch::HttpFetcher;
use crate::web::html::{truncate_chars, HtmlExtractor};
use crate::web::search::{GAMIFIED_UK, MARCZEWSKI};
use reqwest::Url;
use std::fmt::Write as _;
use std::str::FromStr;

/// Hosts (and their subdomains) that may be scraped.
pub const ALLOWED_DOMAINS: [&str; 2] = [GAMIFIED_UK, MARCZEWSKI];

/// Maximum characters of page text returned.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Maximum links returned for `links` and `all`.
pub const MAX_LINKS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractType {
    #[default]
    Text,
    Links,
    Headings,
    All,
}

impl FromStr for ExtractType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "text" => Ok(ExtractType::Text),
            "links" => Ok(ExtractType::Links),
            "headings" => Ok(ExtractType::Headings),
            "all" => Ok(ExtractType::All),
            other => Err(AppError::InvalidArgument(format!(
                "extract_type must be one of text, links, headings, all (got '{}')",
                other
            ))),
        }
    }
}

/// Parse `raw` and require an http(s) URL on an allowed host.
///
/// Runs before any network access.
pub fn check_allowed(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::InvalidArgument(format!("invalid url '{}': {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidArgument(format!(
            "unsupported url scheme '{}'",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| AppError::InvalidArgument(format!("url '{}' has no host", raw)))?;

    if !is_allowed_url(&url) {
        return Err(AppError::InvalidArgument(format!(
            "domain '{}' is not allowed; only {} can be scraped",
            host.trim_end_matches('.').to_lowercase(),
            ALLOWED_DOMAINS.join(" and ")
        )));
    }

    Ok(url)
}

/// True for http(s) URLs whose host is an allowed domain or a subdomain of one.
///
/// Also consulted for every redirect hop the fetcher is asked to follow.
pub fn is_allowed_url(url: &Url) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_end_matches('.').to_lowercase();

    ALLOWED_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}

/// Fetch an allowed page and render the requested extraction as text.
pub async fn scrape(
    fetcher: &dyn HttpFetcher,
    extractor: &HtmlExtractor,
    raw_url: &str,
    extract_type: ExtractType,
) -> Result<String> {
    let url = check_allowed(raw_url)?;

    let response = fetcher
        .fetch(url.as_str(), &[("Accept", "text/html,application/xhtml+xml")])
        .await?;

    if response.is_redirect() {
        return Err(AppError::CollaboratorFailure(format!(
            "Fetching {} was redirected (status {}) outside {}; the redirect was not followed",
            url,
            response.status,
            ALLOWED_DOMAINS.join(" and ")
        )));
    }

    if !response.is_success() {
        return Err(AppError::CollaboratorFailure(format!(
            "Fetching {} returned status {}",
            url, response.status
        )));
    }

    Ok(render(extractor, &url, &response.body, extract_type))
}

/// Build the text payload for one extraction mode.
pub fn render(extractor: &HtmlExtractor, url: &Url, html: &str, extract_type: ExtractType) -> String {
    let mut out = format!("Content from {}\n", url);

    if matches!(extract_type, ExtractType::Text | ExtractType::All) {
        let text = extractor.text(html);
        let (text, truncated) = truncate_chars(&text, MAX_TEXT_CHARS);
        let _ = write!(out, "\nText:\n{}", text);
        if truncated {
            out.push_str("...");
        }
        out.push('\n');
    }

    if matches!(extract_type, ExtractType::Headings | ExtractType::All) {
        out.push_str("\nHeadings:\n");
        let headings = extractor.headings(html);
        if headings.is_empty() {
            out.push_str("(none)\n");
        }
        for (level, text) in headings {
            let _ = writeln!(out, "{} {}", "#".repeat(level as usize), text);
        }
    }

    if matches!(extract_type, ExtractType::Links | ExtractType::All) {
        out.push_str("\nLinks:\n");
        let links = extractor.links(html, url);
        if links.is_empty() {
            out.push_str("(none)\n");
        }
        for (text, href) in links.into_iter().take(MAX_LINKS) {
            let label = if text.is_empty() { href.as_str() } else { text.as_str() };
            let _ = writeln!(out, "- {} ({})", label, href);
        }
    }

    out
}
