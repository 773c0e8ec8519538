//! Topic Research and Summarization
//!
//! This module turns a block of study topics into cited English summaries.
//!
//! # Architecture
//!
//! - [`collector::ResearchCollector`] - Gathers page text for one topic under a
//!   word target and an attempt bound
//! - [`pipeline::TopicPipeline`] - translate → collect → summarize for one topic
//! - [`orchestrator::SubmissionOrchestrator`] - Runs the pipeline over every
//!   topic of a submission, in input order, reporting progress
//! - [`factory::OrchestratorFactory`] - Builds an orchestrator per request
//!
//! # Usage
//!
//! ```ignore
//! use topic_digest::research::SubmissionOrchestrator;
//!
//! let orchestrator = SubmissionOrchestrator::from_config(&config.pipeline_config()).await?;
//!
//! let result = orchestrator.submit("Linear Algebra\nThermodynamics").await?;
//! for topic in result.iter() {
//!     println!("{} -> {}", topic.topic, topic.summary);
//! }
//! ```
//!
//! # Research Workflow
//!
//! 1. **Splitting** - One topic per non-blank input line
//! 2. **Translating** - English rendering used for search and summarization
//! 3. **Collecting** - Search + extraction passes until the word target, the
//!    attempt bound, or a pass that adds nothing
//! 4. **Summarizing** - One or two paragraphs per topic
//! 5. **Aggregating** - Results in input order

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::toml_config::SearchProviderKind;

/// Search + extraction loop for one topic.
pub mod collector;
/// Per-request orchestrator construction.
pub mod factory;
/// Submission-level state machine.
pub mod orchestrator;
/// Single-topic pipeline.
pub mod pipeline;
/// Progress reporting and diagnostic logging for one submission.
pub mod progress;

pub use collector::{AccumulatedContent, CollectorSettings, ResearchCollector};
pub use factory::{ConfigBasedOrchestratorFactory, OrchestratorFactory};
pub use orchestrator::{SubmissionOrchestrator, SubmissionStage};
pub use pipeline::TopicPipeline;
pub use progress::ProgressReporter;

/// How the final summary of a topic is prompted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Topic label plus accumulated research (summarize-topic template)
    #[default]
    Topic,
    /// Accumulated research alone (summarize-content template); topics with no
    /// content still use the topic template
    Content,
}

/// Explicit settings for one pipeline instance
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub search_provider: SearchProviderKind,
    pub search_endpoint: String,
    pub search_api_key: Option<String>,
    pub search_num_results: usize,
    pub generation_endpoint: String,
    pub generation_timeout: Duration,
    /// Models tried in order until one answers
    pub model_preference_order: Vec<String>,
    pub word_accumulation_target: usize,
    pub max_collection_attempts: usize,
    pub extraction_timeout: Duration,
    pub excerpt_max_chars: usize,
    pub inter_request_delay: Duration,
    pub summary_mode: SummaryMode,
    pub submission_log_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_provider: SearchProviderKind::Http,
            search_endpoint: "https://serpapi.com/search".to_string(),
            search_api_key: None,
            search_num_results: 10,
            generation_endpoint: "http://localhost:11434".to_string(),
            generation_timeout: Duration::from_secs(120),
            model_preference_order: vec!["llama3.2".to_string()],
            word_accumulation_target: 10_000,
            max_collection_attempts: 10,
            extraction_timeout: Duration::from_secs(10),
            excerpt_max_chars: 2000,
            inter_request_delay: Duration::from_secs(1),
            summary_mode: SummaryMode::Topic,
            submission_log_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Thresholds and pacing for the research collector
    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            word_target: self.word_accumulation_target,
            max_attempts: self.max_collection_attempts,
            inter_request_delay: self.inter_request_delay,
        }
    }
}
