//! Configuration parsing for the memestore CLI.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default SQLite file, created next to the working directory on first use.
pub const DEFAULT_DB_PATH: &str = "crypto_ruanas.sqlite";

/// Memestore: manage blockchain ecosystems and their meme coins in SQLite.
#[derive(Parser, Debug, Clone)]
#[command(name = "memestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Config {
    /// Path to the SQLite database file (created if absent)
    #[arg(short, long, env = "MEMESTORE_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log line format on stderr
    #[arg(long, env = "MEMESTORE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Format of log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upsert a JSON array of token records
    Upsert {
        /// File holding the batch
        file: PathBuf,
    },
    /// Print every row of a table
    Read {
        /// Table name (Blockchain or MemeCoin)
        table: String,
    },
    /// Update rows matching a condition
    Update {
        /// Table name (Blockchain or MemeCoin)
        table: String,
        /// Assignment in the form column=value (repeatable)
        #[arg(short = 's', long = "set", required = true)]
        assignments: Vec<String>,
        /// Row filter, e.g. "symbol = 'PEPE'"
        #[arg(short = 'w', long = "where")]
        condition: String,
    },
    /// Delete rows matching a condition
    Delete {
        /// Table name (Blockchain or MemeCoin)
        table: String,
        /// Row filter, e.g. "symbol = 'BONK'"
        #[arg(short = 'w', long = "where")]
        condition: String,
    },
    /// Print tokens joined with their ecosystem, by market cap
    Report,
    /// Run a walkthrough against the configured database
    Demo,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a configuration for testing.
    #[cfg(test)]
    pub fn test_config(db_path: PathBuf) -> Self {
        Self {
            db_path,
            log_level: "debug".into(),
            log_format: LogFormat::Text,
            output: OutputFormat::Json,
            command: Command::Report,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: "info".into(),
            log_format: LogFormat::Text,
            output: OutputFormat::Text,
            command: Command::Report,
        }
    }
}
