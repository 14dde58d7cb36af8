//! Configuration for the balance refresh cycle
//!
//! Values come from defaults, an optional TOML or JSON file, then `NEXUS_*`
//! environment variables (a `.env` file is honored).

use std::env;
use std::fs;
use std::path::Path;

use common::bridge_types::{PollConfig, RetryConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

const ENV_PREFIX: &str = "NEXUS_";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension, TOML unless the file ends in `.json`
    pub fn from_path(path: &Path) -> ConfigFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// Publish demo balances when fetching fails
    pub fallback_enabled: bool,
    /// Retry policy for SDK initialization and balance fetches
    pub retry: RetryConfig,
    /// Wait for the wallet to expose a provider handle
    pub provider_poll: PollConfig,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fallback_enabled: true,
            retry: RetryConfig::default(),
            provider_poll: PollConfig::default(),
        }
    }
}

impl WalletConfig {
    /// Defaults, then the file at `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;

        info!(
            "Configuration loaded: {} attempt(s), fallback {}",
            config.retry.max_attempts,
            if config.fallback_enabled { "on" } else { "off" }
        );
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }

    /// Apply `NEXUS_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(level) = get("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(value) = get("FALLBACK_ENABLED") {
            self.fallback_enabled = parse_value("FALLBACK_ENABLED", &value)?;
        }
        if let Some(value) = get("MAX_ATTEMPTS") {
            self.retry.max_attempts = parse_value("MAX_ATTEMPTS", &value)?;
        }
        if let Some(value) = get("BASE_DELAY_MS") {
            self.retry.base_delay_ms = parse_value("BASE_DELAY_MS", &value)?;
        }
        if let Some(value) = get("BACKOFF_MULTIPLIER") {
            self.retry.backoff_multiplier = parse_value("BACKOFF_MULTIPLIER", &value)?;
        }
        if let Some(value) = get("MAX_DELAY_MS") {
            self.retry.max_delay_ms = parse_value("MAX_DELAY_MS", &value)?;
        }
        if let Some(value) = get("ATTEMPT_TIMEOUT_MS") {
            self.retry.attempt_timeout_ms = parse_value("ATTEMPT_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = get("PROVIDER_POLL_ATTEMPTS") {
            self.provider_poll.max_attempts = parse_value("PROVIDER_POLL_ATTEMPTS", &value)?;
        }
        if let Some(value) = get("PROVIDER_POLL_INTERVAL_MS") {
            self.provider_poll.interval_ms = parse_value("PROVIDER_POLL_INTERVAL_MS", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue("retry.max_attempts must be at least 1".into()));
        }
        if !(self.retry.backoff_multiplier >= 1.0) {
            return Err(ConfigError::InvalidValue(
                "retry.backoff_multiplier must be at least 1.0".into(),
            ));
        }
        if self.retry.attempt_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("retry.attempt_timeout_ms must be positive".into()));
        }
        if self.provider_poll.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "provider_poll.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{}{}={}", ENV_PREFIX, name, raw)))
}
