//! Normalization of provider responses into [`Article`]s.
//!
//! The normalizer is the only place defaults are applied. Its output never
//! contains missing fields, and an empty result set is reported as
//! [`PipelineError::NoResults`] rather than as an empty success.

use crate::error::PipelineError;
use crate::models::{Article, Category, RawArticle};
use crate::providers::NewsProvider;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use tracing::{debug, info, warn};

pub const PLACEHOLDER_SUMMARY: &str = "No description available";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200?text=No+Image+Available";
pub const PLACEHOLDER_DATE: &str = "Unknown date";
pub const PLACEHOLDER_TITLE: &str = "Untitled";
pub const PLACEHOLDER_SOURCE: &str = "Unknown source";

/// Maps provider bodies to normalized articles.
#[derive(Debug, Clone)]
pub struct Normalizer {
    date_format: String,
}

/// Whether `pattern` is a chrono strftime string that can be rendered.
pub fn is_valid_date_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("%-m/%-d/%Y")
    }
}

impl Normalizer {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Parse `body` with `provider` and normalize every article.
    ///
    /// `category` is the category the request was made under; it alone
    /// decides the display label.
    pub fn normalize(
        &self,
        provider: &dyn NewsProvider,
        body: &str,
        category: Category,
    ) -> Result<Vec<Article>, PipelineError> {
        let raw = provider.parse_response(body).inspect_err(|e| {
            warn!(provider = provider.name(), kind = e.kind(), error = %e, "Provider response rejected");
        })?;

        if raw.is_empty() {
            info!(provider = provider.name(), %category, "Provider returned no articles");
            return Err(PipelineError::NoResults);
        }

        let articles: Vec<Article> = raw
            .into_iter()
            .map(|a| self.normalize_article(a, category))
            .collect();
        debug!(count = articles.len(), %category, "Normalized articles");
        Ok(articles)
    }

    /// Apply defaults to a single article.
    pub fn normalize_article(&self, raw: RawArticle, category: Category) -> Article {
        Article {
            title: raw.title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            category: category.label().to_string(),
            summary: raw
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_SUMMARY.to_string()),
            source: raw
                .source_name
                .unwrap_or_else(|| PLACEHOLDER_SOURCE.to_string()),
            date: self.format_date(raw.published_at.as_deref()),
            url: raw.url.unwrap_or_default(),
            image: raw
                .image
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }

    /// Render a provider timestamp as a local calendar date.
    ///
    /// Unparsable or missing timestamps, and a format string chrono cannot
    /// render, yield [`PLACEHOLDER_DATE`] instead of failing the batch.
    pub fn format_date(&self, published_at: Option<&str>) -> String {
        let Some(raw) = published_at else {
            return PLACEHOLDER_DATE.to_string();
        };
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => {
                let mut date = String::new();
                let local = ts.with_timezone(&Local);
                match write!(date, "{}", local.format(&self.date_format)) {
                    Ok(()) => date,
                    Err(_) => {
                        warn!(format = %self.date_format, "Invalid date format");
                        PLACEHOLDER_DATE.to_string()
                    }
                }
            }
            Err(e) => {
                debug!(raw, error = %e, "Unparsable publication timestamp");
                PLACEHOLDER_DATE.to_string()
            }
        }
    }
}
