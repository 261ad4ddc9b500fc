//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upper bound for concurrent per-match fetches.
pub const MAX_CONCURRENT_MATCHES: usize = 32;

/// Upstream limit on a single hub match page.
pub const MAX_MATCH_PAGE: u32 = 100;

/// Upstream API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// API root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Matches fetched at the same time during a load
    #[serde(default = "default_max_concurrent_matches")]
    pub max_concurrent_matches: usize,
}

fn default_base_url() -> String {
    "https://open.faceit.com/data/v4".to_string()
}

fn default_api_key_env() -> String {
    "FACEIT_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrent_matches() -> usize {
    4
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
            max_concurrent_matches: default_max_concurrent_matches(),
        }
    }
}

impl UpstreamConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// The hub whose matches are aggregated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_hub_id")]
    pub hub_id: String,

    /// Leaderboard merged into the table; none means no merge
    #[serde(default = "default_leaderboard_id")]
    pub leaderboard_id: Option<String>,

    /// Most recent matches considered per load
    #[serde(default = "default_max_matches")]
    pub max_matches: u32,
}

fn default_hub_id() -> String {
    "f1137391-0c60-40f4-8b54-1b7ae8ec5bcc".to_string()
}

fn default_leaderboard_id() -> Option<String> {
    Some("69319308c5bdcb0bf0f0ee5f".to_string())
}

fn default_max_matches() -> u32 {
    100
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_id: default_hub_id(),
            leaderboard_id: default_leaderboard_id(),
            max_matches: default_max_matches(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Periodic reload interval (e.g. "10m"); unset disables it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_interval: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            reload_interval: None,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub hub: HubConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            upstream: UpstreamConfig::default(),
            hub: HubConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_CONCURRENT_MATCHES).contains(&self.upstream.max_concurrent_matches) {
            return Err(ConfigError::ValidationError(format!(
                "max_concurrent_matches must be between 1 and {}",
                MAX_CONCURRENT_MATCHES
            )));
        }

        if !(1..=MAX_MATCH_PAGE).contains(&self.hub.max_matches) {
            return Err(ConfigError::ValidationError(format!(
                "max_matches must be between 1 and {}",
                MAX_MATCH_PAGE
            )));
        }

        if self.hub.hub_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "hub_id must not be empty".to_string(),
            ));
        }

        if let Some(interval) = &self.server.reload_interval {
            if crate::parse_duration(interval).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid reload_interval: {}",
                    interval
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
