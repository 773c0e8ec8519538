//! Mock implementations for testing.
//!
//! This module provides mock generation clients, search gateways, extractors
//! and an orchestrator factory that can be used across different test files
//! without duplication. Every mock counts its calls so tests can assert that
//! nothing touched the network.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use topic_digest::llm::{LLMClient, ModelChain};
use topic_digest::research::{
    CollectorSettings, OrchestratorFactory, ResearchCollector, SubmissionOrchestrator,
    SummaryMode, TopicPipeline,
};
use topic_digest::tools::{ContentExtractor, SearchGateway};
use topic_digest::types::{AppError, Result};

// ============= Generation =============

#[derive(Clone)]
enum Behaviour {
    Fixed(String),
    Fail,
    /// Answers translation prompts with "<topic> (en)" and summary prompts
    /// with "Summary of <topic>."
    Topical,
}

/// Mock LLM client with configurable responses.
///
/// ```ignore
/// let client = MockLLMClient::new("Hello, world!");
/// let client = MockLLMClient::failing();
/// let client = MockLLMClient::topical();
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    model: String,
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLLMClient {
    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            model: "mock-model".to_string(),
            behaviour,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always returns `response`
    pub fn new(response: &str) -> Self {
        Self::with_behaviour(Behaviour::Fixed(response.to_string()))
    }

    /// Always fails with a transport-style error
    pub fn failing() -> Self {
        Self::with_behaviour(Behaviour::Fail)
    }

    /// Derives its answer from the prompt
    pub fn topical() -> Self {
        Self::with_behaviour(Behaviour::Topical)
    }

    pub fn named(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

/// Topic embedded in a translation prompt (`Topic: ...` on the last line)
fn translation_topic(prompt: &str) -> Option<&str> {
    prompt.rsplit_once("Topic: ").map(|(_, topic)| topic.trim())
}

/// Topic quoted in a summary prompt (`study topic "..."`)
fn summary_topic(prompt: &str) -> Option<&str> {
    let (_, rest) = prompt.split_once("study topic \"")?;
    rest.split_once('"').map(|(topic, _)| topic)
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        match &self.behaviour {
            Behaviour::Fixed(response) => Ok(response.clone()),
            Behaviour::Fail => Err(AppError::LLM("Mock LLM failure".to_string())),
            Behaviour::Topical => {
                if prompt.starts_with("Translate") {
                    let topic = translation_topic(prompt).unwrap_or_default();
                    Ok(format!("{} (en)", topic))
                } else {
                    let topic = summary_topic(prompt).unwrap_or("the text");
                    Ok(format!("Summary of {}.", topic))
                }
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============= Search =============

/// Search gateway returning scripted result lists, one per call.
///
/// After the script runs out the last list is repeated.
pub struct ScriptedSearchGateway {
    script: Vec<Vec<String>>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSearchGateway {
    pub fn new(script: Vec<Vec<&str>>) -> Self {
        Self {
            script: script
                .into_iter()
                .map(|urls| urls.into_iter().map(str::to_string).collect())
                .collect(),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Same results on every call
    pub fn always(urls: Vec<&str>) -> Self {
        Self::new(vec![urls])
    }

    /// Provider that never finds anything
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchGateway for ScriptedSearchGateway {
    async fn search(&self, query: &str) -> Vec<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.to_string());
        self.script
            .get(call)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// ============= Extraction =============

/// Extractor serving canned page text.
pub struct MockExtractor {
    pages: HashMap<String, String>,
    default_text: String,
    calls: AtomicUsize,
}

impl MockExtractor {
    /// Every URL yields `text`
    pub fn uniform(text: &str) -> Self {
        Self {
            pages: HashMap::new(),
            default_text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every URL yields nothing (unreachable, timed out, or not textual)
    pub fn unreachable() -> Self {
        Self::uniform("")
    }

    /// Specific text per URL, nothing for anything else
    pub fn pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, text)| (url.to_string(), text.to_string()))
                .collect(),
            default_text: String::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentExtractor for MockExtractor {
    async fn extract(&self, url: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.default_text.clone())
    }
}

/// `n` distinct words
pub fn words(n: usize) -> String {
    (0..n)
        .map(|i| format!("w{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn fast_settings(word_target: usize, max_attempts: usize) -> CollectorSettings {
    CollectorSettings {
        word_target,
        max_attempts,
        inter_request_delay: std::time::Duration::ZERO,
    }
}

// ============= Orchestration =============

/// Shared collaborators for building orchestrators in tests
#[derive(Clone)]
pub struct MockWorld {
    pub llm: MockLLMClient,
    pub search: Arc<ScriptedSearchGateway>,
    pub extractor: Arc<MockExtractor>,
    pub settings: CollectorSettings,
    pub summary_mode: SummaryMode,
}

impl MockWorld {
    pub fn new(
        llm: MockLLMClient,
        search: ScriptedSearchGateway,
        extractor: MockExtractor,
    ) -> Self {
        Self {
            llm,
            search: Arc::new(search),
            extractor: Arc::new(extractor),
            settings: fast_settings(100, 3),
            summary_mode: SummaryMode::Topic,
        }
    }

    pub fn orchestrator(&self) -> SubmissionOrchestrator {
        self.orchestrator_with_log(None)
    }

    pub fn orchestrator_with_log(&self, log_dir: Option<std::path::PathBuf>) -> SubmissionOrchestrator {
        let chain = ModelChain::new(vec![Arc::new(self.llm.clone())]);
        let collector = ResearchCollector::new(
            self.search.clone(),
            self.extractor.clone(),
            self.settings,
        );
        SubmissionOrchestrator::new(TopicPipeline::new(chain, collector, self.summary_mode), log_dir)
    }

    /// Total calls to any external collaborator
    pub fn network_calls(&self) -> usize {
        self.llm.call_count() + self.search.call_count() + self.extractor.call_count()
    }
}

/// Factory handing out orchestrators over a [`MockWorld`]
pub struct MockOrchestratorFactory {
    pub world: MockWorld,
    pub fail: bool,
}

impl MockOrchestratorFactory {
    pub fn new(world: MockWorld) -> Self {
        Self { world, fail: false }
    }

    pub fn failing(world: MockWorld) -> Self {
        Self { world, fail: true }
    }
}

#[async_trait]
impl OrchestratorFactory for MockOrchestratorFactory {
    async fn create(&self) -> Result<SubmissionOrchestrator> {
        if self.fail {
            return Err(AppError::Configuration(
                "Mock factory failure".to_string(),
            ));
        }
        Ok(self.world.orchestrator())
    }
}
