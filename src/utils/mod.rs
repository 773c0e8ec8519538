//! Configuration and diagnostics utilities.

/// Per-submission append-only diagnostic log.
pub mod submission_log;
/// TOML configuration with hot reload.
pub mod toml_config;
