//! GNews search API adapter.
//!
//! Requests go to `https://gnews.io/api/v4/search` with the token passed as a
//! query parameter. Successful bodies look like:
//!
//! ```json
//! { "totalArticles": 2, "articles": [ { "title": "...", "description": "...",
//!   "url": "...", "image": "...", "publishedAt": "2025-05-06T12:00:00Z",
//!   "source": { "name": "...", "url": "..." } } ] }
//! ```
//!
//! Errors are reported as `{ "errors": ["message", ...] }` (sometimes an
//! object keyed by parameter name).

use super::{NewsProvider, ProviderSettings, classify_message, endpoint};
use crate::config::ConfigError;
use crate::error::PipelineError;
use crate::models::{ProviderQuery, RawArticle};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Option<Vec<WireArticle>>,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<WireSource>,
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
            image: a.image,
        }
    }
}

/// The GNews adapter.
#[derive(Debug, Clone)]
pub struct Gnews {
    search_url: Url,
    settings: ProviderSettings,
}

impl Gnews {
    pub fn new(base_url: &str, settings: ProviderSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            search_url: endpoint(base_url, "search")?,
            settings,
        })
    }
}

/// Flatten the `errors` field, which may be a list or a map of messages.
fn error_messages(errors: &Value) -> Vec<String> {
    let to_text = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match errors {
        Value::Array(items) => items.iter().map(to_text).collect(),
        Value::Object(map) => map.values().map(to_text).collect(),
        Value::Null => Vec::new(),
        other => vec![to_text(other)],
    }
}

impl NewsProvider for Gnews {
    fn name(&self) -> &'static str {
        "GNews"
    }

    fn build_query(&self, search: &str) -> ProviderQuery {
        ProviderQuery {
            endpoint: self.search_url.clone(),
            parameters: vec![
                ("token".to_string(), self.settings.api_key.clone()),
                ("q".to_string(), search.to_string()),
                ("lang".to_string(), self.settings.language.clone()),
                ("max".to_string(), self.settings.max_results.to_string()),
                ("sortby".to_string(), "publishedAt".to_string()),
                ("in".to_string(), "title,description".to_string()),
            ],
            secret_param: "token",
        }
    }

    fn parse_response(&self, body: &str) -> Result<Vec<RawArticle>, PipelineError> {
        let response: SearchResponse = serde_json::from_str(body)
            .map_err(|e| PipelineError::Unknown(format!("unreadable GNews response: {}", e)))?;

        if let Some(errors) = response.errors.as_ref() {
            let messages = error_messages(errors);
            if !messages.is_empty() {
                let joined = messages.iter().join("; ");
                return Err(classify_message(&joined));
            }
        }

        Ok(response
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(RawArticle::from)
            .collect())
    }
}
