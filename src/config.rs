//! Feed configuration loaded from an optional YAML file.
//!
//! Values not present in the file fall back to serde defaults. Command-line
//! flags are applied on top by [`FeedConfig::apply_cli`].

use crate::cli::Cli;
use crate::models::Category;
use crate::normalize::is_valid_date_format;
use clap::ValueEnum;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid base URL {0:?}: {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The news search provider backing the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// gnews.io search API.
    #[default]
    Gnews,
    /// newsapi.org "everything" API.
    Newsapi,
}

/// Static configuration of the feed.
///
/// # Example
///
/// ```yaml
/// provider: newsapi
/// api_key: "0123456789abcdef"
/// max_results: 20
/// timeout_ms: 5000
/// default_category: ai-ml
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Which provider adapter to use.
    pub provider: ProviderKind,
    /// Provider API key or token.
    pub api_key: Option<String>,
    /// Overrides the provider's default API base URL.
    pub base_url: Option<String>,
    /// Two-letter language code sent to the provider.
    pub language: String,
    /// Upper bound on articles requested per search.
    pub max_results: u32,
    /// Deadline for a single fetch.
    pub timeout_ms: u64,
    /// Quiet period before a search-text change triggers a fetch.
    pub debounce_ms: u64,
    /// Category fetched on startup.
    pub default_category: Category,
    /// chrono format string for article dates.
    pub date_format: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            base_url: None,
            language: "en".to_string(),
            max_results: 12,
            timeout_ms: 10_000,
            debounce_ms: 400,
            default_category: Category::Latest,
            date_format: "%-m/%-d/%Y".to_string(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from a YAML file.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        info!(path, provider = ?config.provider, "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Overlay command-line flags onto the loaded configuration.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(provider) = cli.provider {
            self.provider = provider;
        }
        if let Some(ref key) = cli.api_key {
            self.api_key = Some(key.clone());
        }
        if let Some(ref base_url) = cli.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(ref category) = cli.category {
            self.default_category = Category::parse(category);
        }
    }

    /// Reject values that cannot produce a working pipeline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".into()));
        }
        if self.max_results == 0 {
            return Err(ConfigError::Invalid("max_results must be positive".into()));
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".into()));
        }
        if !is_valid_date_format(&self.date_format) {
            return Err(ConfigError::Invalid(format!(
                "date_format {:?} is not a valid strftime pattern",
                self.date_format
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
