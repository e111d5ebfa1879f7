//! Error types for the news pipeline.
//!
//! [`PipelineError`] is the closed, user-facing taxonomy every pipeline run
//! resolves to on failure. Each variant carries a short message and a
//! remediation hint for the error panel. [`TransportError`] describes
//! failures below the HTTP status level and never reaches the user directly.

use thiserror::Error;

/// A classified pipeline failure.
///
/// Every variant is recoverable by user action (retry, new search, fixing
/// the API key); none of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("No internet connection detected.")]
    NetworkUnavailable,

    #[error("The news request timed out.")]
    Timeout,

    #[error("API key is invalid or expired. Please check your news API key.")]
    AuthError,

    #[error("Daily quota exceeded. Please try again tomorrow.")]
    RateLimited,

    #[error("The news service is having problems (HTTP {0}).")]
    ServerError(u16),

    #[error("No articles found for the selected category.")]
    NoResults,

    #[error("Failed to fetch news: {0}")]
    Unknown(String),
}

impl PipelineError {
    /// Classify a non-success HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => PipelineError::AuthError,
            404 => PipelineError::NoResults,
            429 => PipelineError::RateLimited,
            500..=599 => PipelineError::ServerError(status),
            other => PipelineError::Unknown(format!("unexpected HTTP status {}", other)),
        }
    }

    /// A remediation tip shown under the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            PipelineError::NetworkUnavailable => {
                Some("Please check your internet connection and try again.")
            }
            PipelineError::Timeout => {
                Some("The news service did not answer in time. Try again in a moment.")
            }
            PipelineError::AuthError => Some(
                "Make sure your API key is valid and not expired. You may need to register for a new key with your news provider.",
            ),
            PipelineError::RateLimited => Some(
                "You have reached the daily limit for news requests. The free tier allows 100 requests per day.",
            ),
            PipelineError::ServerError(_) => {
                Some("The provider is having trouble right now. Try again later.")
            }
            PipelineError::NoResults => {
                Some("Try broadening your search terms or selecting a different category.")
            }
            PipelineError::Unknown(_) => Some(
                "If the error persists, try again later or check your internet connection.",
            ),
        }
    }

    /// A stable machine-readable name, used in logs and JSON snapshots.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NetworkUnavailable => "network_unavailable",
            PipelineError::Timeout => "timeout",
            PipelineError::AuthError => "auth_error",
            PipelineError::RateLimited => "rate_limited",
            PipelineError::ServerError(_) => "server_error",
            PipelineError::NoResults => "no_results",
            PipelineError::Unknown(_) => "unknown",
        }
    }
}

/// Failure of the HTTP transport before any status code was available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    TimedOut,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::TimedOut
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}
