//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cinedb_api::tmdb::{DEFAULT_MAX_ATTEMPTS, RetryLimit};
use serde::{Deserialize, Serialize};

/// Language used when neither the CLI nor the config sets one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB client settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// TMDB client configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API key (overridden by `TMDB_API_KEY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Session id for rating calls (overridden by `TMDB_SESSION_ID`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Default response language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Alternate API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Re-send throttled requests.
    #[serde(default)]
    pub auto_retry: bool,
    /// Sends per call when retrying (`0` = unlimited).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Abort in-flight calls on Ctrl-C.
    #[serde(default)]
    pub context_propagation: bool,
}

impl TmdbConfig {
    /// Retry limit derived from `max_attempts`.
    #[must_use]
    pub const fn retry_limit(&self) -> RetryLimit {
        match self.max_attempts {
            Some(0) => RetryLimit::Unbounded,
            Some(n) => RetryLimit::Attempts(n),
            None => RetryLimit::Attempts(DEFAULT_MAX_ATTEMPTS),
        }
    }

    /// Request timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Language to request, preferring `cli_language`.
    #[must_use]
    pub fn language<'a>(&'a self, cli_language: Option<&'a str>) -> &'a str {
        cli_language
            .or(self.language.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

impl AppConfig {
    /// Config written by `config init`.
    #[must_use]
    pub fn template() -> Self {
        Self {
            tmdb: TmdbConfig {
                api_key: Some(String::new()),
                language: Some(String::from(DEFAULT_LANGUAGE)),
                auto_retry: true,
                max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
                timeout_secs: Some(10),
                ..TmdbConfig::default()
            },
        }
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Writes config to a new TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file already exists, or if directory creation
    /// or the write fails.
    pub fn create(&self, path: &Path) -> Result<()> {
        if path.exists() {
            bail!("config file already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
