//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.rosterlens.toml` files.

use crate::cli::OutputFormat;
use crate::models::Selection;
use crate::roster::sample::DEFAULT_SAMPLE_COUNT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".rosterlens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Roster API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Default filter selections.
    #[serde(default)]
    pub filters: FilterConfig,

    /// What to do when the roster can't be fetched.
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Roster API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the worker list endpoint.
    #[serde(default = "default_workers_path")]
    pub workers_path: String,

    /// Path of the signed-in user endpoint. Empty to skip it.
    #[serde(default = "default_current_user_path")]
    pub current_user_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            workers_path: default_workers_path(),
            current_user_path: default_current_user_path(),
            timeout_seconds: default_timeout(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_workers_path() -> String {
    "/api/workers".to_string()
}

fn default_current_user_path() -> String {
    "/api/users/me".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Default filter selections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub role: Selection,

    #[serde(default)]
    pub status: Selection,
}

/// Fallback behavior on fetch failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Substitute a generated roster when the fetch fails.
    #[serde(default)]
    pub sample_on_error: bool,

    /// Number of generated users.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            sample_on_error: false,
            sample_count: default_sample_count(),
        }
    }
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Show each bucket's share of the filtered roster.
    #[serde(default = "default_true")]
    pub include_percentages: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            include_percentages: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values the user passed explicitly override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(ref token) = args.token {
            self.api.token = Some(token.clone());
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }

        if let Some(ref role) = args.role {
            self.filters.role = Selection::from(role.as_str());
        }
        if let Some(ref status) = args.status {
            self.filters.status = Selection::from(status.as_str());
        }

        if args.sample_on_error {
            self.fallback.sample_on_error = true;
        }
        if let Some(count) = args.sample_count {
            self.fallback.sample_count = count;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.no_percentages {
            self.report.include_percentages = false;
        }
    }

    /// Validate the merged configuration.
    ///
    /// Catches values set in the config file that the CLI checks never see.
    pub fn validate(&self) -> Result<(), String> {
        if self.api.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be at least 1".to_string());
        }

        if self.fallback.sample_count == 0 {
            return Err("fallback.sample_count must be at least 1".to_string());
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
