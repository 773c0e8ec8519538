//! Search gateway implementations
//!
//! A [`SearchGateway`] turns a query into ranked result URLs. Provider failures
//! (missing credential, non-success status, network errors, unparseable bodies)
//! are logged and reported as an empty result list, never as an error: the
//! research collector treats "no results" as a normal outcome.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::research::PipelineConfig;
use crate::utils::toml_config::SearchProviderKind;

/// Result-list keys understood in provider responses, checked in this order
const RESULT_LIST_KEYS: [&str; 4] = ["organic_results", "items", "organic", "results"];

/// Query an external search provider for ranked result URLs
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Search for `query`; returns an empty list on any provider failure
    async fn search(&self, query: &str) -> Vec<String>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// JSON-over-GET provider (SerpAPI, Google Custom Search and compatible APIs)
pub struct HttpSearchGateway {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    num_results: usize,
}

impl HttpSearchGateway {
    pub fn new(endpoint: String, api_key: Option<String>, num_results: usize) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for search: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            endpoint,
            api_key,
            num_results,
        }
    }

    async fn fetch(&self, query: &str, api_key: &str) -> Result<Value, String> {
        let num = self.num_results.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("api_key", api_key), ("num", num.as_str())])
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("provider returned {}", status));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| format!("invalid JSON body: {}", e))
    }
}

#[async_trait]
impl SearchGateway for HttpSearchGateway {
    async fn search(&self, query: &str) -> Vec<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Search API key is not configured; returning no results");
            return Vec::new();
        };

        match self.fetch(query, api_key).await {
            Ok(body) => {
                let links = extract_links(&body, self.num_results);
                debug!(query, count = links.len(), "Search complete");
                links
            }
            Err(e) => {
                warn!(query, "Search failed: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Credential-free web search powered by daedra (DuckDuckGo backend)
pub struct DuckDuckGoGateway {
    num_results: usize,
}

impl DuckDuckGoGateway {
    pub fn new(num_results: usize) -> Self {
        Self { num_results }
    }
}

impl Default for DuckDuckGoGateway {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl SearchGateway for DuckDuckGoGateway {
    async fn search(&self, query: &str) -> Vec<String> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: self.num_results,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) => {
                let links: Vec<String> = response
                    .data
                    .iter()
                    .map(|r| r.url.to_string())
                    .filter(|url| is_http_url(url))
                    .take(self.num_results)
                    .collect();
                debug!(query, count = links.len(), "DuckDuckGo search complete");
                links
            }
            Err(e) => {
                warn!(query, "DuckDuckGo search failed: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Build the gateway selected by configuration
pub fn create_gateway(config: &PipelineConfig) -> Arc<dyn SearchGateway> {
    match config.search_provider {
        SearchProviderKind::Http => Arc::new(HttpSearchGateway::new(
            config.search_endpoint.clone(),
            config.search_api_key.clone(),
            config.search_num_results,
        )),
        SearchProviderKind::DuckDuckGo => {
            Arc::new(DuckDuckGoGateway::new(config.search_num_results))
        }
    }
}

/// Pull result links out of a provider response body, in ranking order
pub fn extract_links(body: &Value, limit: usize) -> Vec<String> {
    RESULT_LIST_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.get("link")
                        .or_else(|| item.get("url"))
                        .and_then(Value::as_str)
                })
                .map(str::trim)
                .filter(|url| is_http_url(url))
                .map(str::to_string)
                .take(limit)
                .collect()
        })
        .unwrap_or_default()
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_links_serpapi_shape() {
        let body = json!({
            "search_metadata": {"status": "Success"},
            "organic_results": [
                {"position": 1, "title": "A", "link": "https://a.example/1"},
                {"position": 2, "title": "B", "link": "https://b.example/2"}
            ]
        });
        assert_eq!(
            extract_links(&body, 10),
            vec!["https://a.example/1", "https://b.example/2"]
        );
    }

    #[test]
    fn test_extract_links_google_cse_shape() {
        let body = json!({"items": [{"link": "https://c.example"}, {"title": "no link"}]});
        assert_eq!(extract_links(&body, 10), vec!["https://c.example"]);
    }

    #[test]
    fn test_extract_links_url_field_and_limit() {
        let body = json!({"results": [
            {"url": "https://1.example"},
            {"url": "https://2.example"},
            {"url": "https://3.example"}
        ]});
        assert_eq!(
            extract_links(&body, 2),
            vec!["https://1.example", "https://2.example"]
        );
    }

    #[test]
    fn test_extract_links_skips_non_http() {
        let body = json!({"items": [
            {"link": "javascript:void(0)"},
            {"link": "  "},
            {"link": "http://ok.example"}
        ]});
        assert_eq!(extract_links(&body, 10), vec!["http://ok.example"]);
    }

    #[test]
    fn test_extract_links_unknown_shape() {
        assert!(extract_links(&json!({"error": "quota"}), 10).is_empty());
        assert!(extract_links(&json!([]), 10).is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_returns_empty() {
        let gateway = HttpSearchGateway::new("http://127.0.0.1:9".to_string(), None, 10);
        assert!(gateway.search("anything").await.is_empty());
        assert_eq!(gateway.name(), "http");
    }

    #[tokio::test]
    async fn test_unreachable_provider_returns_empty() {
        // Port 9 (discard) is not expected to be serving HTTP
        let gateway = HttpSearchGateway::new(
            "http://127.0.0.1:9/search".to_string(),
            Some("key".to_string()),
            10,
        );
        assert!(gateway.search("anything").await.is_empty());
    }
}
