//! # Topic Digest
//!
//! Turns a list of study topics into English research summaries, each backed by
//! cited web sources, and delivers them either as one JSON document or as a live
//! progressive stream.
//!
//! ## Overview
//!
//! Topic Digest can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `topic-digest` binary
//! 2. **As a library** - Embed the research pipeline in your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use topic_digest::{DigestConfig, SubmissionOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DigestConfig::load("topic-digest.toml")?;
//!     let orchestrator = SubmissionOrchestrator::from_config(&config.pipeline_config()).await?;
//!
//!     let result = orchestrator.submit("Álgebra lineal\nThermodynamik").await?;
//!     println!("{}", result.to_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ### Streaming progress
//!
//! ```rust,ignore
//! use topic_digest::events::{SubmissionEvent, encode_event};
//!
//! let mut events = orchestrator.spawn(topics);
//! while let Some(event) = events.recv().await {
//!     print!("{}", encode_event(&event)?);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`events`] - Submission events and their wire framing
//! - [`llm`] - Text-generation clients with model fallback
//! - [`research`] - Collector, per-topic pipeline and submission orchestrator
//! - [`tools`] - Web search gateways and page extraction
//! - [`types`] - Wire types and error handling
//! - [`utils`] - Configuration and diagnostic logging
//!
//! ## Configuration
//!
//! Settings live in a TOML file (`topic-digest.toml`) and are hot-reloaded while
//! the server runs. Secrets such as the search API key are read from the
//! environment (or `.env`), never from the file.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Progress/result/failure events and the stream codec.
pub mod events;
/// LLM provider clients and abstractions.
pub mod llm;
/// Topic research and summarization.
pub mod research;
/// Web search and content extraction.
pub mod tools;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use events::SubmissionEvent;
pub use llm::{LLMClient, ModelChain, Provider};
pub use research::{
    ConfigBasedOrchestratorFactory, OrchestratorFactory, PipelineConfig, SubmissionOrchestrator,
};
pub use types::{AppError, Result, SubmissionResult, TopicResult};
pub use utils::toml_config::{DigestConfig, DigestConfigManager};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based configuration with hot-reload support
    pub config_manager: Arc<DigestConfigManager>,
    /// Builds one orchestrator per submission
    pub orchestrator_factory: Arc<dyn OrchestratorFactory>,
}

impl AppState {
    /// State backed by the configuration manager for both fields
    pub fn from_config_manager(config_manager: Arc<DigestConfigManager>) -> Self {
        Self {
            orchestrator_factory: Arc::new(ConfigBasedOrchestratorFactory::new(
                config_manager.clone(),
            )),
            config_manager,
        }
    }
}

/// Full application router: `/health` plus the API under `/api`
pub fn app(state: AppState) -> axum::Router {
    use axum::routing::get;
    use tower::ServiceBuilder;
    use tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    };

    axum::Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api::routes::create_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
