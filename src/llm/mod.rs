//! LLM Provider Clients and Abstractions
//!
//! This module provides the text-generation side of the research pipeline.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait, one client per model identifier
//! - [`Provider`] - Runtime provider selection (Ollama-compatible servers)
//! - [`ModelChain`] - Ordered fallback across several models
//! - [`PromptTemplate`] - Translation and summarization prompts
//!
//! # Example
//!
//! ```ignore
//! use topic_digest::llm::ModelChain;
//!
//! let models = vec!["llama3.2".to_string(), "mistral".to_string()];
//! let chain = ModelChain::ollama("http://localhost:11434", &models, timeout).await?;
//!
//! let english = chain.translate("Termodinámica").await;
//! let summary = chain.summarize_topic(&english, Some(&research_text)).await;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Fallback chain across models.
pub mod fallback;
/// Ollama `/api/generate` client.
pub mod ollama;
/// Prompt templates.
pub mod prompts;

pub use client::{LLMClient, Provider};
pub use fallback::ModelChain;
pub use prompts::{NO_SUMMARY_SENTINEL, PromptTemplate};
