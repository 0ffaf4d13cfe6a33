//! Configuration management with JSON files and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Application configuration with layered loading.
///
/// Precedence: CLI flags > config file > built-in defaults. Unknown
/// keys in a config file are ignored; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Marketplace base URL requests are built against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Marketplace label, informational only
    #[serde(default = "default_marketplace")]
    pub marketplace: String,

    /// Worker pool size for batch scraping (floor 1)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Export formats written after a run
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<ExportFormat>,

    /// Directory exported files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Path to the ASIN input file
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,
}

fn default_base_url() -> String {
    "https://www.amazon.com".to_string()
}

fn default_marketplace() -> String {
    "US".to_string()
}

fn default_concurrency() -> usize {
    5
}

fn default_timeout_seconds() -> u64 {
    20
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/119.0 Safari/537.36"
        .to_string()
}

fn default_output_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Json, ExportFormat::Csv]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_input_file() -> PathBuf {
    PathBuf::from("data/inputs.sample.txt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            marketplace: default_marketplace(),
            concurrency: default_concurrency(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
            output_formats: default_output_formats(),
            output_dir: default_output_dir(),
            input_file: default_input_file(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("settings.json");
        if local_config.exists() {
            debug!("Found settings.json in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("asin-scraper").join("settings.json");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

/// Error for an export format name outside the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported export format '{0}'. Valid formats: json, csv, excel, html")]
pub struct UnknownFormatError(pub String);

/// Supported export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Excel,
    Html,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Html => "html",
        }
    }

    /// Parses a comma-separated format list, e.g. "json,csv".
    ///
    /// Empty entries are skipped; any unknown name fails the whole list
    /// so a bad request is rejected before fetching starts.
    pub fn parse_list(list: &str) -> Result<Vec<ExportFormat>, UnknownFormatError> {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "excel" => Ok(ExportFormat::Excel),
            "html" => Ok(ExportFormat::Html),
            other => Err(UnknownFormatError(other.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}
