//! News provider adapters.
//!
//! Each provider exposes the same two capabilities through [`NewsProvider`]:
//!
//! 1. **Query building**: turn an effective search string into a
//!    provider-specific [`ProviderQuery`]
//! 2. **Response parsing**: read the provider's JSON body into
//!    provider-independent [`RawArticle`]s, surfacing provider-reported errors
//!
//! # Supported Providers
//!
//! | Provider | Module | Endpoint | Credential param |
//! |----------|--------|----------|------------------|
//! | GNews | [`gnews`] | `/api/v4/search` | `token` |
//! | NewsAPI | [`newsapi`] | `/v2/everything` | `apiKey` |
//!
//! Exactly one provider is active per run; it is chosen by
//! [`FeedConfig::provider`](crate::config::FeedConfig).

pub mod gnews;
pub mod newsapi;

use crate::config::{ConfigError, FeedConfig, ProviderKind};
use crate::error::PipelineError;
use crate::models::{ProviderQuery, RawArticle};
use url::Url;

/// A news search API the pipeline can talk to.
pub trait NewsProvider {
    /// Human-readable provider name, used in logs.
    fn name(&self) -> &'static str;

    /// Build the HTTP request for an effective search string.
    fn build_query(&self, search: &str) -> ProviderQuery;

    /// Parse a successful (2xx) response body.
    ///
    /// Returns the articles as reported, possibly empty; a provider-reported
    /// error or an unreadable body becomes a [`PipelineError`].
    fn parse_response(&self, body: &str) -> Result<Vec<RawArticle>, PipelineError>;
}

/// Settings shared by every provider adapter.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub language: String,
    pub max_results: u32,
}

impl ProviderSettings {
    fn from_config(config: &FeedConfig) -> Self {
        Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            language: config.language.clone(),
            max_results: config.max_results,
        }
    }
}

/// Resolve `path` below a base URL, tolerating a missing trailing slash.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url, ConfigError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| ConfigError::InvalidUrl(base.to_string(), e))
}

/// Instantiate the provider selected by the configuration.
pub fn from_config(config: &FeedConfig) -> Result<Box<dyn NewsProvider + Send + Sync>, ConfigError> {
    let settings = ProviderSettings::from_config(config);
    let base = config.base_url.as_deref();
    let provider: Box<dyn NewsProvider + Send + Sync> = match config.provider {
        ProviderKind::Gnews => Box::new(gnews::Gnews::new(
            base.unwrap_or(gnews::DEFAULT_BASE_URL),
            settings,
        )?),
        ProviderKind::Newsapi => Box::new(newsapi::NewsApi::new(
            base.unwrap_or(newsapi::DEFAULT_BASE_URL),
            settings,
        )?),
    };
    Ok(provider)
}

/// Classify a free-form provider error message.
///
/// Providers that only report prose are mapped onto the same taxonomy as
/// HTTP statuses where the wording allows it.
pub(crate) fn classify_message(message: &str) -> PipelineError {
    const AUTH: [&str; 3] = ["api key", "apikey", "token"];
    const RATE: [&str; 4] = ["quota", "request limit", "rate limit", "too many requests"];

    let lower = message.to_lowercase();
    if AUTH.iter().any(|k| lower.contains(k)) {
        PipelineError::AuthError
    } else if RATE.iter().any(|k| lower.contains(k)) {
        PipelineError::RateLimited
    } else {
        PipelineError::Unknown(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash() {
        let a = endpoint("https://gnews.io/api/v4", "search").unwrap();
        let b = endpoint("https://gnews.io/api/v4/", "search").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://gnews.io/api/v4/search");
    }

    #[test]
    fn test_endpoint_invalid() {
        assert!(matches!(
            endpoint("not a url", "search"),
            Err(ConfigError::InvalidUrl(_, _))
        ));
    }

    #[test]
    fn test_from_config_selects_provider() {
        let mut config = FeedConfig::default();
        assert_eq!(from_config(&config).unwrap().name(), "GNews");
        config.provider = ProviderKind::Newsapi;
        assert_eq!(from_config(&config).unwrap().name(), "NewsAPI");
    }

    #[test]
    fn test_classify_message() {
        assert_eq!(
            classify_message("You have reached your daily quota"),
            PipelineError::RateLimited
        );
        assert_eq!(
            classify_message("Your API key is invalid"),
            PipelineError::AuthError
        );
        assert_eq!(
            classify_message("Too many requests, slow down"),
            PipelineError::RateLimited
        );
        assert_eq!(
            classify_message("Something odd"),
            PipelineError::Unknown("Something odd".to_string())
        );
    }

    #[test]
    fn test_classify_message_bare_limit_is_not_rate_limited() {
        let msg = "max must be lower than the limit of 100";
        assert_eq!(classify_message(msg), PipelineError::Unknown(msg.to_string()));
        assert_eq!(
            classify_message("Your API key has exceeded its limit"),
            PipelineError::AuthError
        );
    }
}
