use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{Ollama, generation::completion::request::GenerationRequest};
use reqwest::Url;
use std::time::Duration;

const DEFAULT_OLLAMA_PORT: u16 = 11434;

pub struct OllamaClient {
    client: Ollama,
    model: String,
}

impl OllamaClient {
    /// Bind a client to `model` on the server at `base_url`.
    ///
    /// `timeout` bounds every generate call, connection included.
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self> {
        let (host, port) = parse_base_url(&base_url)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::LLM(format!("Failed to build Ollama HTTP client: {}", e)))?;

        let client = Ollama::new_with_client(host, port, http);

        Ok(Self { client, model })
    }
}

/// Split `base_url` into the `scheme://host` and port pair `Ollama` expects.
///
/// A missing scheme means `http`; a missing port means Ollama's default port.
fn parse_base_url(base_url: &str) -> Result<(String, u16)> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/api/generate").unwrap_or(trimmed);
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| AppError::Configuration(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Configuration(format!(
            "Unsupported Ollama URL scheme '{}'",
            url.scheme()
        )));
    }
    let host = url
        .host_str()
        .ok_or_else(|| AppError::Configuration(format!("Ollama URL '{}' has no host", base_url)))?;

    Ok((
        format!("{}://{}", url.scheme(), host),
        url.port().unwrap_or(DEFAULT_OLLAMA_PORT),
    ))
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerationRequest::new(self.model.clone(), prompt.to_string());

        let response = self
            .client
            .generate(request)
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error for model '{}': {}", self.model, e)))?;

        Ok(response.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
