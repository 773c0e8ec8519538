//! Page content extraction
//!
//! [`ContentExtractor`] fetches a URL and reduces it to a bounded plain-text
//! excerpt. Failures of any kind (network error, timeout, non-success status,
//! non-textual content) produce an empty string: "nothing usable retrieved".

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Elements whose text never counts as page content
const SKIPPED_ELEMENTS: [&str; 11] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "svg", "iframe",
    "template",
];

const USER_AGENT: &str = concat!("topic-digest/", env!("CARGO_PKG_VERSION"));

/// Fetch a URL and return its readable text, or an empty string
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> String;
}

/// reqwest + scraper based extractor
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    http: reqwest::Client,
    timeout: Duration,
    max_chars: usize,
}

impl HtmlExtractor {
    pub fn new(timeout: Duration, max_chars: usize) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for extraction: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            timeout,
            max_chars,
        }
    }

    async fn fetch_body(&self, url: &str) -> Result<String, String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("status {}", status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_ascii_lowercase();
        if !is_textual(&content_type) {
            return Err(format!("unsupported content type {}", content_type));
        }

        response
            .text()
            .await
            .map_err(|e| format!("body read failed: {}", e))
    }
}

#[async_trait]
impl ContentExtractor for HtmlExtractor {
    async fn extract(&self, url: &str) -> String {
        // Dropping the future on timeout cancels the in-flight request
        match tokio::time::timeout(self.timeout, self.fetch_body(url)).await {
            Ok(Ok(body)) => {
                let text = html_to_text(&body, self.max_chars);
                debug!(url, chars = text.chars().count(), "Extracted page text");
                text
            }
            Ok(Err(e)) => {
                debug!(url, "Extraction failed: {}", e);
                String::new()
            }
            Err(_) => {
                warn!(url, "Extraction timed out after {:?}", self.timeout);
                String::new()
            }
        }
    }
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or(content_type).trim();
    mime.starts_with("text/") || mime == "application/xhtml+xml"
}

/// Reduce an HTML (or plain text) document to collapsed visible text,
/// capped at `max_chars` characters
pub fn html_to_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element());

    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| SKIPPED_ELEMENTS.contains(&el.value().name()));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    truncate_to_chars(&words.join(" "), max_chars)
}

fn truncate_to_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
