//! Ordered model fallback chain
//!
//! A [`ModelChain`] holds one [`LLMClient`] per candidate model, in preference
//! order. A logical generation call tries each client in turn and keeps the
//! first answer that is non-empty after post-processing. Transport errors are
//! logged and treated exactly like an empty answer, so one unreachable model
//! never prevents the next one from being asked. When every candidate fails the
//! template's fallback value is returned, which means callers never see an
//! empty string.

use crate::llm::client::{LLMClient, Provider};
use crate::llm::prompts::PromptTemplate;
use crate::types::{AppError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Generation client with an ordered list of candidate models
#[derive(Clone)]
pub struct ModelChain {
    clients: Vec<Arc<dyn LLMClient>>,
}

impl ModelChain {
    /// Create a chain from already-built clients (first = most preferred)
    pub fn new(clients: Vec<Arc<dyn LLMClient>>) -> Self {
        Self { clients }
    }

    /// Build one Ollama client per model identifier
    pub async fn ollama(base_url: &str, models: &[String], timeout: Duration) -> Result<Self> {
        if models.is_empty() {
            return Err(AppError::Configuration(
                "At least one generation model is required".to_string(),
            ));
        }

        let mut clients: Vec<Arc<dyn LLMClient>> = Vec::with_capacity(models.len());
        for model in models {
            let provider = Provider::Ollama {
                base_url: base_url.to_string(),
                model: model.clone(),
                timeout,
            };
            clients.push(Arc::from(provider.create_client().await?));
        }

        Ok(Self::new(clients))
    }

    /// Model identifiers in the order they are tried
    pub fn models(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.model_name()).collect()
    }

    /// Run a template through the chain, falling back to the template's default
    pub async fn generate(&self, template: &PromptTemplate<'_>) -> String {
        let prompt = template.render();

        for client in &self.clients {
            match client.generate(&prompt).await {
                Ok(raw) => {
                    let answer = template.postprocess(&raw);
                    if !answer.is_empty() {
                        debug!(
                            template = template.id(),
                            model = client.model_name(),
                            "Generation succeeded"
                        );
                        return answer;
                    }
                    warn!(
                        template = template.id(),
                        model = client.model_name(),
                        "Model returned an empty response, trying next"
                    );
                }
                Err(e) => {
                    warn!(
                        template = template.id(),
                        model = client.model_name(),
                        "Model call failed, trying next: {}",
                        e
                    );
                }
            }
        }

        warn!(
            template = template.id(),
            "All {} models failed, using fallback",
            self.clients.len()
        );
        template.fallback()
    }

    /// Translate a topic to English; returns the source text if every model fails
    pub async fn translate(&self, text: &str) -> String {
        self.generate(&PromptTemplate::Translate { text }).await
    }

    /// Summarize raw extracted text; returns the sentinel if every model fails
    pub async fn summarize_content(&self, content: &str) -> String {
        self.generate(&PromptTemplate::SummarizeContent { content })
            .await
    }

    /// Summarize a topic from its accumulated research, or from nothing
    pub async fn summarize_topic(&self, topic: &str, content: Option<&str>) -> String {
        self.generate(&PromptTemplate::SummarizeTopic { topic, content })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::NO_SUMMARY_SENTINEL;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Scripted client that records the prompts it receives
    struct ScriptedClient {
        model: String,
        reply: std::result::Result<String, String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedClient {
        fn new(
            model: &str,
            reply: std::result::Result<&str, &str>,
            calls: Arc<Mutex<Vec<String>>>,
        ) -> Arc<dyn LLMClient> {
            Arc::new(Self {
                model: model.to_string(),
                reply: reply.map(str::to_string).map_err(str::to_string),
                calls,
            })
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.lock().push(self.model.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(msg) => Err(AppError::LLM(msg.clone())),
            }
        }

        fn model_name(&self) -> &str {
            &self.model
        }
    }

    #[tokio::test]
    async fn test_first_non_empty_model_wins() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ModelChain::new(vec![
            ScriptedClient::new("a", Ok("   "), calls.clone()),
            ScriptedClient::new("b", Err("connection refused"), calls.clone()),
            ScriptedClient::new("c", Ok("A summary."), calls.clone()),
            ScriptedClient::new("d", Ok("never asked"), calls.clone()),
        ]);

        let summary = chain.summarize_content("text").await;

        assert_eq!(summary, "A summary.");
        assert_eq!(*calls.lock(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_summary_sentinel_when_all_fail() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ModelChain::new(vec![
            ScriptedClient::new("a", Err("timeout"), calls.clone()),
            ScriptedClient::new("b", Ok(""), calls.clone()),
        ]);

        assert_eq!(
            chain.summarize_topic("Optics", None).await,
            NO_SUMMARY_SENTINEL
        );
        assert_eq!(calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_translation_falls_back_to_source() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ModelChain::new(vec![ScriptedClient::new("a", Err("down"), calls)]);

        assert_eq!(chain.translate("Termodinámica").await, "Termodinámica");
    }

    #[tokio::test]
    async fn test_translation_uses_first_line() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = ModelChain::new(vec![ScriptedClient::new(
            "a",
            Ok("Thermodynamics\n(translated from Spanish)"),
            calls,
        )]);

        assert_eq!(chain.translate("Termodinámica").await, "Thermodynamics");
    }

    #[tokio::test]
    async fn test_empty_chain_uses_fallback() {
        let chain = ModelChain::new(vec![]);
        assert_eq!(chain.translate("Optik").await, "Optik");
        assert_eq!(chain.summarize_content("x").await, NO_SUMMARY_SENTINEL);
    }

    #[tokio::test]
    async fn test_ollama_chain_requires_models() {
        let result = ModelChain::ollama("http://localhost:11434", &[], Duration::from_secs(1)).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_ollama_chain_preserves_order() {
        let models = vec!["qwen2.5".to_string(), "llama3.2".to_string()];
        let chain = ModelChain::ollama("http://localhost:11434", &models, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(chain.models(), vec!["qwen2.5", "llama3.2"]);
    }
}
