//! NewsAPI "everything" endpoint adapter.
//!
//! Successful bodies carry `status: "ok"` and an `articles` list whose image
//! field is named `urlToImage`. Failures are reported in-band:
//!
//! ```json
//! { "status": "error", "code": "apiKeyInvalid", "message": "..." }
//! ```

use super::{NewsProvider, ProviderSettings, endpoint};
use crate::config::ConfigError;
use crate::error::PipelineError;
use crate::models::{ProviderQuery, RawArticle};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Option<Vec<WireArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    source: Option<WireSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    name: Option<String>,
}

impl From<WireArticle> for RawArticle {
    fn from(a: WireArticle) -> Self {
        RawArticle {
            title: a.title,
            description: a.description,
            source_name: a.source.and_then(|s| s.name),
            published_at: a.published_at,
            url: a.url,
            image: a.url_to_image,
        }
    }
}

/// Map a NewsAPI error code onto the pipeline taxonomy.
fn classify_code(code: Option<&str>, message: Option<&str>) -> PipelineError {
    match code {
        Some("apiKeyDisabled" | "apiKeyExhausted" | "apiKeyInvalid" | "apiKeyMissing") => {
            PipelineError::AuthError
        }
        Some("rateLimited") => PipelineError::RateLimited,
        _ => PipelineError::Unknown(
            message
                .or(code)
                .unwrap_or("provider reported an error")
                .to_string(),
        ),
    }
}

/// The NewsAPI adapter.
#[derive(Debug, Clone)]
pub struct NewsApi {
    everything_url: Url,
    settings: ProviderSettings,
}

impl NewsApi {
    pub fn new(base_url: &str, settings: ProviderSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            everything_url: endpoint(base_url, "everything")?,
            settings,
        })
    }
}

impl NewsProvider for NewsApi {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    fn build_query(&self, search: &str) -> ProviderQuery {
        ProviderQuery {
            endpoint: self.everything_url.clone(),
            parameters: vec![
                ("apiKey".to_string(), self.settings.api_key.clone()),
                ("q".to_string(), search.to_string()),
                ("language".to_string(), self.settings.language.clone()),
                ("pageSize".to_string(), self.settings.max_results.to_string()),
                ("sortBy".to_string(), "publishedAt".to_string()),
                ("searchIn".to_string(), "title,description".to_string()),
            ],
            secret_param: "apiKey",
        }
    }

    fn parse_response(&self, body: &str) -> Result<Vec<RawArticle>, PipelineError> {
        let response: EverythingResponse = serde_json::from_str(body)
            .map_err(|e| PipelineError::Unknown(format!("unreadable NewsAPI response: {}", e)))?;

        if response.status.as_deref() == Some("error") {
            return Err(classify_code(
                response.code.as_deref(),
                response.message.as_deref(),
            ));
        }

        Ok(response
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(RawArticle::from)
            .collect())
    }
}
