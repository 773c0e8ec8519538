//! CLI module for topic-digest
//!
//! Provides command-line interface parsing for the topic-digest binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// topic-digest - cited research summaries for study topics
#[derive(Parser, Debug)]
#[command(
    name = "topic-digest",
    version,
    about = "topic-digest - cited research summaries for study topics",
    long_about = "Translates study topics to English, collects web sources for each one and\n\
                  summarizes them with a local Ollama model.\n\n\
                  Run without arguments to start the HTTP server, or use 'research' to\n\
                  process topics directly from the terminal.",
    after_help = "EXAMPLES:\n    \
                  topic-digest                          # Start the server (reads topic-digest.toml)\n    \
                  topic-digest serve --no-watch         # Start without config hot reload\n    \
                  topic-digest research topics.txt      # Research the topics in a file\n    \
                  echo 'Optik' | topic-digest research  # Research topics from stdin\n    \
                  topic-digest config --validate        # Check the configuration file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "topic-digest.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Do not reload the configuration file when it changes
        #[arg(long)]
        no_watch: bool,
    },

    /// Research topics locally and print the result JSON
    ///
    /// Reads one topic per line from FILE, or from stdin when FILE is omitted.
    /// Progress is printed to stderr, the result to stdout.
    Research {
        /// File with one topic per line
        file: Option<PathBuf>,

        /// Pretty-print the result JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_server() {
        let cli = Cli::try_parse_from(["topic-digest"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("topic-digest.toml"));
    }

    #[test]
    fn test_research_args() {
        let cli =
            Cli::try_parse_from(["topic-digest", "research", "topics.txt", "--pretty", "--no-color"])
                .unwrap();
        assert!(cli.no_color);
        match cli.command {
            Some(Commands::Research { file, pretty }) => {
                assert_eq!(file, Some(PathBuf::from("topics.txt")));
                assert!(pretty);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["topic-digest", "serve", "--no-watch", "-c", "alt.toml"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(cli.command, Some(Commands::Serve { no_watch: true })));
    }
}
