//! Bootstrap configuration
//!
//! Settings come from a TOML file located in priority order:
//! 1. Command-line argument (`--config`)
//! 2. `PHILO_CONFIG` environment variable
//! 3. `~/.config/philopalette/philo-rec.toml`
//! 4. Built-in defaults
//!
//! A missing or unreadable file is never fatal. The service logs a warning and starts with
//! defaults.

use crate::profile_builder::TraitMergePolicy;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "PHILO_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub recommendations: RecommendationConfig,

    #[serde(default)]
    pub gutenberg: GutenbergConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logging: LoggingConfig::default(),
            recommendations: RecommendationConfig::default(),
            gutenberg: GutenbergConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendationConfig {
    /// Books returned per list when a request names no limit
    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default)]
    pub trait_merge: TraitMergePolicy,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            trait_merge: TraitMergePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GutenbergConfig {
    #[serde(default = "default_gutenberg_url")]
    pub base_url: String,

    /// Pages fetched per search term
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Minimum spacing between requests
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the built-in topic and philosopher list
    #[serde(default)]
    pub search_terms: Option<Vec<String>>,
}

impl Default for GutenbergConfig {
    fn default() -> Self {
        Self {
            base_url: default_gutenberg_url(),
            max_pages: default_max_pages(),
            request_interval_ms: default_request_interval_ms(),
            timeout_secs: default_timeout_secs(),
            search_terms: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5731
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_limit() -> usize {
    6
}

fn default_gutenberg_url() -> String {
    "https://gutendex.com".to_string()
}

fn default_max_pages() -> u32 {
    3
}

fn default_request_interval_ms() -> u64 {
    250
}

fn default_timeout_secs() -> u64 {
    15
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Resolve the config file and load it, falling back to defaults
    pub fn load(cli_arg: Option<&Path>) -> Self {
        let Some(path) = resolve_config_path(cli_arg) else {
            info!("No config file found, using built-in defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config unusable, using built-in defaults");
                Self::default()
            }
        }
    }
}

/// Pick the config file path by priority
///
/// Explicit paths (argument, environment) are returned even if they do not exist so the
/// caller can report them. The per-user default is only returned when present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// `<config dir>/philopalette/philo-rec.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("philopalette").join("philo-rec.toml"))
}
