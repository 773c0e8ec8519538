//! TOML-based configuration for Topic Digest
//!
//! This module provides declarative configuration for the HTTP server, the
//! search provider, the generation backend and the research thresholds via a
//! TOML file (`topic-digest.toml`).
//!
//! # Hot Reloading
//!
//! Configuration changes are automatically detected and applied at runtime.
//! Use `DigestConfigManager` for thread-safe access to the current configuration.
//! A submission that is already running keeps the settings it started with.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::research::{PipelineConfig, SummaryMode};

/// Root configuration structure loaded from topic-digest.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= Search Configuration =============

/// Which search backend answers topic queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    /// JSON-over-GET provider (`q` query parameter, results with a `link` field)
    Http,
    /// Credential-free DuckDuckGo search through daedra
    DuckDuckGo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_provider")]
    pub provider: SearchProviderKind,

    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Environment variable containing the search API key
    #[serde(default = "default_search_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

fn default_search_provider() -> SearchProviderKind {
    SearchProviderKind::Http
}

fn default_search_endpoint() -> String {
    "https://serpapi.com/search".to_string()
}

fn default_search_api_key_env() -> String {
    "SEARCH_API_KEY".to_string()
}

fn default_num_results() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            endpoint: default_search_endpoint(),
            api_key_env: default_search_api_key_env(),
            num_results: default_num_results(),
        }
    }
}

// ============= Generation Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the Ollama-compatible generation server
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,

    /// Models in preference order; the first non-empty answer wins
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_generation_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "llama3.2".to_string(),
        "mistral".to_string(),
        "gemma2".to_string(),
    ]
}

fn default_generation_timeout_secs() -> u64 {
    120
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            models: default_models(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

// ============= Research Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Collection stops once this many words are accumulated; also the hard cap
    #[serde(default = "default_word_target")]
    pub word_target: usize,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,

    /// Characters kept from each extracted page
    #[serde(default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,

    /// Pause between successive search calls
    #[serde(default = "default_inter_request_delay_ms")]
    pub inter_request_delay_ms: u64,

    #[serde(default)]
    pub summary_mode: SummaryMode,
}

fn default_word_target() -> usize {
    10_000
}

fn default_max_attempts() -> usize {
    10
}

fn default_extraction_timeout_secs() -> u64 {
    10
}

fn default_excerpt_max_chars() -> usize {
    2000
}

fn default_inter_request_delay_ms() -> u64 {
    1000
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            word_target: default_word_target(),
            max_attempts: default_max_attempts(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
            excerpt_max_chars: default_excerpt_max_chars(),
            inter_request_delay_ms: default_inter_request_delay_ms(),
            summary_mode: SummaryMode::default(),
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for per-submission diagnostic logs; disabled when unset
    pub submission_log_dir: Option<PathBuf>,
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

/// Non-fatal configuration issue reported by `validate_with_warnings`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
}

impl DigestConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: DigestConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.generation.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "generation.endpoint must not be empty".to_string(),
            ));
        }

        if self.generation.models.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "generation.models must name at least one model".to_string(),
            ));
        }

        if self.search.provider == SearchProviderKind::Http && self.search.endpoint.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "search.endpoint must not be empty for the http provider".to_string(),
            ));
        }

        if self.search.num_results == 0 {
            return Err(ConfigError::ValidationError(
                "search.num_results must be positive".to_string(),
            ));
        }

        if self.research.word_target == 0
            || self.research.max_attempts == 0
            || self.research.excerpt_max_chars == 0
        {
            return Err(ConfigError::ValidationError(
                "research.word_target, max_attempts and excerpt_max_chars must be positive"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Validate configuration and collect non-fatal warnings
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();

        if self.search.provider == SearchProviderKind::Http && self.search_api_key().is_none() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Environment variable '{}' is not set; every search will return no results",
                    self.search.api_key_env
                ),
            });
        }

        if self.research.extraction_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                message: "research.extraction_timeout_secs is 0; every page fetch will time out"
                    .to_string(),
            });
        }

        Ok(warnings)
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get the search API key from the environment, if any
    pub fn search_api_key(&self) -> Option<String> {
        self.resolve_env(&self.search.api_key_env)
    }

    /// Model identifiers in preference order, blanks removed
    pub fn model_preference_order(&self) -> Vec<String> {
        self.generation
            .models
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Build the explicit settings value handed to the research pipeline
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            search_provider: self.search.provider,
            search_endpoint: self.search.endpoint.clone(),
            search_api_key: self.search_api_key(),
            search_num_results: self.search.num_results,
            generation_endpoint: self.generation.endpoint.clone(),
            generation_timeout: Duration::from_secs(self.generation.timeout_secs),
            model_preference_order: self.model_preference_order(),
            word_accumulation_target: self.research.word_target,
            max_collection_attempts: self.research.max_attempts,
            extraction_timeout: Duration::from_secs(self.research.extraction_timeout_secs),
            excerpt_max_chars: self.research.excerpt_max_chars,
            inter_request_delay: Duration::from_millis(self.research.inter_request_delay_ms),
            summary_mode: self.research.summary_mode,
            submission_log_dir: self.logging.submission_log_dir.clone(),
        }
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct DigestConfigManager {
    config: Arc<ArcSwap<DigestConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
}

impl DigestConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Convert to absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = DigestConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
        })
    }

    /// Create a config manager directly from a config (useful for testing)
    /// This won't have file watching capabilities.
    pub fn from_config(config: DigestConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("topic-digest.toml"),
            watcher: RwLock::new(None),
        }
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<DigestConfig> {
        self.config.load_full()
    }

    /// Path the configuration was loaded from
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = DigestConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        // Debounced in the receiver
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Editors often replace the file, so watch its directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let mut last_reload: Option<std::time::Instant> = None;
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                if last_reload.is_some_and(|at| at.elapsed() < debounce_duration) {
                    continue;
                }

                // Wait a bit for the write to complete
                tokio::time::sleep(Duration::from_millis(100)).await;

                match DigestConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = Some(std::time::Instant::now());
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }

    /// Whether a file watcher is currently installed
    pub fn is_watching(&self) -> bool {
        self.watcher.read().is_some()
    }
}
