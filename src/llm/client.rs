//! LLM client abstraction and provider selection
//!
//! Every generation backend implements [`LLMClient`]. One client is bound to one
//! model identifier; the fallback behaviour across models lives in
//! [`ModelChain`](crate::llm::fallback::ModelChain).

use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    ///
    /// An `Ok` with an empty string means the backend answered with nothing.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// Ollama-compatible server exposing `POST /api/generate`
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    ///     timeout: Duration::from_secs(120),
    /// };
    /// ```
    Ollama {
        base_url: String,
        model: String,
        timeout: Duration,
    },
}

impl Provider {
    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::Ollama {
                base_url,
                model,
                timeout,
            } => {
                if base_url.trim().is_empty() {
                    return Err(AppError::Configuration(
                        "Ollama base URL must not be empty".to_string(),
                    ));
                }
                Ok(Box::new(super::ollama::OllamaClient::new(
                    base_url.clone(),
                    model.clone(),
                    *timeout,
                )?))
            }
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier this provider is bound to
    pub fn model(&self) -> &str {
        match self {
            Provider::Ollama { model, .. } => model,
        }
    }
}
