//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// RosterLens - roster distribution reports for factory dashboards
///
/// Fetches the personnel roster from the dashboard API and reports how it
/// breaks down by role, tenure and location. Markdown/JSON reports, CSV export.
///
/// Examples:
///   rosterlens --api-url https://factory.example.com
///   rosterlens --api-url https://factory.example.com --role Worker --status Active
///   rosterlens --input roster.json --format json -o report.json
///   rosterlens --sample --csv roster.csv
///   rosterlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the roster API
    ///
    /// Can also be set via ROSTERLENS_API_URL or .rosterlens.toml.
    #[arg(long, value_name = "URL", env = "ROSTERLENS_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the roster API
    #[arg(long, value_name = "TOKEN", env = "ROSTERLENS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Read the roster from a JSON snapshot instead of the API
    #[arg(short, long, value_name = "FILE", conflicts_with = "sample")]
    pub input: Option<PathBuf>,

    /// Use a generated sample roster (no network call)
    #[arg(long)]
    pub sample: bool,

    /// Number of users in a generated sample roster
    #[arg(long, value_name = "COUNT")]
    pub sample_count: Option<usize>,

    /// Fall back to a generated sample roster if the fetch fails
    #[arg(long)]
    pub sample_on_error: bool,

    /// Only include users with this role ("All" for every role)
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,

    /// Only include users with this status ("All" for every status)
    ///
    /// Values seen in practice: Active, On Leave, Inactive
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Export the filtered roster as CSV to this file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Leave bucket percentages out of the Markdown report
    #[arg(long)]
    pub no_percentages: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .rosterlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when no users match the filters
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Generate a default .rosterlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// True when the roster comes from somewhere other than the API.
    pub fn is_offline(&self) -> bool {
        self.sample || self.input.is_some()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if !self.is_offline() {
            if let Some(ref url) = self.api_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err("API URL must start with 'http://' or 'https://'".to_string());
                }
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(count) = self.sample_count {
            if count == 0 {
                return Err("Sample count must be at least 1".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
            if !input.is_file() {
                return Err(format!("Input path is not a file: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
