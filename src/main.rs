mod cli;

use anyhow::{Context, Result};
use cli::{Cli, Commands, output::Output};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use topic_digest::{
    AppState, DigestConfig, DigestConfigManager, SubmissionEvent, SubmissionOrchestrator,
    utils::toml_config::ConfigError,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        None => serve(&cli.config, cli.verbose, false, &output).await,
        Some(Commands::Serve { no_watch }) => serve(&cli.config, cli.verbose, no_watch, &output).await,
        Some(Commands::Research { ref file, pretty }) => {
            research(&cli.config, cli.verbose, file.as_deref(), pretty, &output).await
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
    }
}

/// Install the global tracing subscriber. Logs always go to stderr.
fn init_tracing(config: &DigestConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("topic_digest={default_level},tower_http={default_level}")));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load the configuration, falling back to defaults when the file is absent
fn load_manager(path: &Path, output: &Output) -> Result<(DigestConfigManager, bool)> {
    match DigestConfigManager::new(path) {
        Ok(manager) => Ok((manager, true)),
        Err(ConfigError::FileNotFound(missing)) => {
            output.warning(&format!(
                "Config file {} not found, using built-in defaults",
                missing.display()
            ));
            Ok((DigestConfigManager::from_config(DigestConfig::default()), false))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

fn report_warnings(config: &DigestConfig, output: &Output) -> Result<()> {
    for warning in config.validate_with_warnings()? {
        output.warning(&warning.message);
    }
    Ok(())
}

async fn serve(config_path: &Path, verbose: bool, no_watch: bool, output: &Output) -> Result<()> {
    output.banner();

    let (manager, from_file) = load_manager(config_path, output)?;
    let config = manager.config();
    init_tracing(&config, verbose);
    report_warnings(&config, output)?;

    if from_file && !no_watch {
        manager
            .start_watching()
            .context("Failed to start configuration watcher")?;
    }

    let state = AppState::from_config_manager(Arc::new(manager));
    let app = topic_digest::app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    output.info(&format!("Listening on http://{}", addr));
    output.kv("Summarize", &format!("POST http://{}/api/summarize", addr));
    output.kv("OpenAPI", &format!("http://{}/api/openapi.json", addr));
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn research(
    config_path: &Path,
    verbose: bool,
    file: Option<&Path>,
    pretty: bool,
    output: &Output,
) -> Result<()> {
    let (manager, _) = load_manager(config_path, output)?;
    let config = manager.config();
    init_tracing(&config, verbose);
    report_warnings(&config, output)?;

    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read topics from stdin")?;
            buffer
        }
    };

    let orchestrator = SubmissionOrchestrator::from_config(&config.pipeline_config()).await?;
    let mut events = orchestrator.spawn(input);

    while let Some(event) = events.recv().await {
        match event {
            SubmissionEvent::Progress(message) => output.progress(&message),
            SubmissionEvent::Result(result) => {
                let json = if pretty {
                    serde_json::to_string_pretty(&result)?
                } else {
                    result.to_json()?
                };
                println!("{}", json);
                output.success(&format!("Summarized {} topic(s)", result.len()));
                return Ok(());
            }
            SubmissionEvent::Failure(message) => {
                output.error(&message);
                anyhow::bail!(message);
            }
        }
    }

    anyhow::bail!("Submission ended without a result")
}

fn show_config(config_path: &Path, validate: bool, output: &Output) -> Result<()> {
    if validate {
        let config = DigestConfig::load(config_path)
            .with_context(|| format!("Invalid configuration {}", config_path.display()))?;
        let warnings = config.validate_with_warnings()?;
        for warning in &warnings {
            output.warning(&warning.message);
        }
        output.success(&format!("{} is valid", config_path.display()));
        return Ok(());
    }

    let (manager, _) = load_manager(config_path, output)?;
    let config = manager.config();

    output.header("Configuration");
    output.kv("File", &manager.config_path().display().to_string());
    output.kv(
        "Models",
        &config.model_preference_order().join(" → "),
    );
    output.kv(
        "Search key",
        if config.search_api_key().is_some() {
            "set"
        } else {
            "missing"
        },
    );
    println!();
    println!(
        "{}",
        toml::to_string_pretty(config.as_ref()).context("Failed to render configuration")?
    );
    output.hint("Secrets are read from the environment and never shown here.");
    Ok(())
}
