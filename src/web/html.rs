//! Best-effort HTML extraction by pattern stripping.
//!
//! This is not a parser: it removes scripts, styles and tags, and pulls out
//! heading text and anchor targets with regular expressions.

use crate::error::{AppError, Result};
use regex::Regex;
use reqwest::Url;

/// Pre-compiled patterns, built once and shared.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    non_content: Regex,
    tag: Regex,
    whitespace: Regex,
    heading: Regex,
    link: Regex,
}

impl HtmlExtractor {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| AppError::InternalError(format!("Invalid pattern {}: {}", pattern, e)))
        };

        Ok(Self {
            non_content: compile(
                r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>|<noscript\b[^>]*>.*?</noscript>|<!--.*?-->",
            )?,
            tag: compile(r"(?s)<[^>]+>")?,
            whitespace: compile(r"\s+")?,
            heading: compile(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>")?,
            link: compile(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a\s*>"#)?,
        })
    }

    /// Visible text with tags removed and whitespace collapsed.
    pub fn text(&self, html: &str) -> String {
        let without_blocks = self.non_content.replace_all(html, " ");
        self.clean_fragment(&without_blocks)
    }

    /// `(level, text)` for each non-empty h1–h6, in document order.
    pub fn headings(&self, html: &str) -> Vec<(u8, String)> {
        let html = self.non_content.replace_all(html, " ");
        self.heading
            .captures_iter(&html)
            .filter_map(|caps| {
                let level: u8 = caps.get(1)?.as_str().parse().ok()?;
                let text = self.clean_fragment(caps.get(2)?.as_str());
                (!text.is_empty()).then_some((level, text))
            })
            .collect()
    }

    /// `(text, absolute url)` for each http(s) anchor, resolved against
    /// `base`, de-duplicated by URL, in document order.
    pub fn links(&self, html: &str, base: &Url) -> Vec<(String, String)> {
        let html = self.non_content.replace_all(html, " ");
        let mut seen = std::collections::HashSet::new();
        self.link
            .captures_iter(&html)
            .filter_map(|caps| {
                let href = decode_entities(caps.get(1)?.as_str().trim());
                if href.starts_with('#') {
                    return None;
                }
                let url = base.join(&href).ok()?;
                if !matches!(url.scheme(), "http" | "https") {
                    return None;
                }
                let url = url.to_string();
                if !seen.insert(url.clone()) {
                    return None;
                }
                let text = self.clean_fragment(caps.get(2)?.as_str());
                Some((text, url))
            })
            .collect()
    }

    fn clean_fragment(&self, fragment: &str) -> String {
        let stripped = self.tag.replace_all(fragment, " ");
        let decoded = decode_entities(&stripped);
        self.whitespace.replace_all(&decoded, " ").trim().to_string()
    }
}

/// Decode the handful of entities common in article markup.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&rsquo;", "'")
        .replace("&lsquo;", "'")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&amp;", "&")
}

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> (&str, bool) {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => (&s[..idx], true),
        None => (s, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><head><title>T</title><style>body { color: red }</style></head>
        <body>
          <script>var x = "<h1>not a heading</h1>";</script>
          <h1 class="entry">Hexad &amp; friends</h1>
          <p>Six <b>user</b> types.</p>
          <h3>Free <em>Spirits</em></h3>
          <a href="/hexad">Hexad</a>
          <a href='https://marczewski.me.uk/about'>About</a>
          <a href="/hexad">Hexad again</a>
          <a href="#top">Top</a>
          <a href="mailto:me@example.com">Mail</a>
          <!-- hidden comment -->
        </body></html>
    "##;

    fn extractor() -> HtmlExtractor {
        HtmlExtractor::new().unwrap()
    }

    #[test]
    fn test_text_strips_scripts_styles_and_tags() {
        let text = extractor().text(PAGE);
        assert!(text.contains("Hexad & friends"));
        assert!(text.contains("Six user types."));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("not a heading"));
        assert!(!text.contains("hidden comment"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_headings_with_levels() {
        let headings = extractor().headings(PAGE);
        assert_eq!(
            headings,
            vec![(1, "Hexad & friends".to_string()), (3, "Free Spirits".to_string())]
        );
    }

    #[test]
    fn test_links_resolved_and_deduplicated() {
        let base = Url::parse("https://gamified.uk/blog/post").unwrap();
        let links = extractor().links(PAGE, &base);
        assert_eq!(
            links,
            vec![
                ("Hexad".to_string(), "https://gamified.uk/hexad".to_string()),
                ("About".to_string(), "https://marczewski.me.uk/about".to_string()),
            ]
        );
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        let (s, cut) = truncate_chars("héllo", 2);
        assert_eq!(s, "hé");
        assert!(cut);
        let (s, cut) = truncate_chars("hi", 5);
        assert_eq!(s, "hi");
        assert!(!cut);
    }
}
