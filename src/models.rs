//! Data models for search requests, provider queries and feed articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Category`]: The fixed set of topic filters offered by the feed
//! - [`SearchRequest`]: What the user asked for (category plus optional free text)
//! - [`ProviderQuery`]: A provider-specific HTTP request descriptor
//! - [`RawArticle`]: A loosely-typed article as reported by the provider
//! - [`Article`]: A normalized, default-filled article ready for rendering

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Query used when neither free text nor a recognized category is given.
pub const DEFAULT_QUERY: &str = "technology news";

/// A topic filter offered by the feed.
///
/// Each category maps to a canned provider query and a display label.
/// [`Category::Unset`] stands for "no filter" and uses the generic defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    AiMl,
    Startups,
    Innovations,
    #[default]
    Latest,
    Unset,
}

impl Category {
    /// Every selectable category, in navigation order.
    pub const ALL: [Category; 4] = [
        Category::Latest,
        Category::AiMl,
        Category::Startups,
        Category::Innovations,
    ];

    /// Parse a category name leniently.
    ///
    /// Unrecognized or empty names resolve to [`Category::Unset`] so that a
    /// query can always be built.
    pub fn parse(name: &str) -> Category {
        match name.trim().to_ascii_lowercase().as_str() {
            "ai-ml" => Category::AiMl,
            "startups" => Category::Startups,
            "innovations" => Category::Innovations,
            "latest" => Category::Latest,
            _ => Category::Unset,
        }
    }

    /// The wire name of the category, e.g. `"ai-ml"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AiMl => "ai-ml",
            Category::Startups => "startups",
            Category::Innovations => "innovations",
            Category::Latest => "latest",
            Category::Unset => "unset",
        }
    }

    /// The canned search string for this category, if it has one.
    pub fn canned_query(&self) -> Option<&'static str> {
        match self {
            Category::AiMl => Some("artificial intelligence OR machine learning OR AI technology"),
            Category::Startups => {
                Some("(tech startup OR technology company OR tech funding OR startup funding)")
            }
            Category::Innovations => Some(
                "(tech innovation OR technology breakthrough OR new technology OR tech advancement)",
            ),
            Category::Latest => Some("technology news"),
            Category::Unset => None,
        }
    }

    /// The display label shown on every article fetched under this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::AiMl => "AI & ML",
            Category::Startups => "Startups",
            Category::Innovations => "Innovations",
            Category::Latest => "Latest News",
            Category::Unset => "Tech News",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pipeline invocation's input.
///
/// Built fresh for every trigger (page load, category switch, search, retry)
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchRequest {
    /// The category the request was made under. Drives the display label.
    pub category: Category,
    /// Free text typed by the user. Overrides the category query when non-empty.
    pub free_text: Option<String>,
}

impl SearchRequest {
    pub fn new(category: Category, free_text: Option<String>) -> Self {
        Self {
            category,
            free_text,
        }
    }

    /// A request for a category with no free text.
    pub fn for_category(category: Category) -> Self {
        Self::new(category, None)
    }

    /// The search string actually sent to the provider.
    ///
    /// Resolution order: non-empty free text, then the category's canned
    /// query, then [`DEFAULT_QUERY`].
    pub fn effective_query(&self) -> &str {
        match self.free_text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => self.category.canned_query().unwrap_or(DEFAULT_QUERY),
        }
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.free_text.as_deref() {
            Some(text) if !text.is_empty() => write!(f, "{} \"{}\"", self.category, text),
            _ => write!(f, "{}", self.category),
        }
    }
}

/// A provider-specific HTTP search request.
///
/// Parameters are kept in insertion order so that the produced URL is
/// deterministic for a given [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    /// The search endpoint, without query string.
    pub endpoint: Url,
    /// Query parameters as `(name, value)` pairs.
    pub parameters: Vec<(String, String)>,
    /// Name of the parameter carrying the credential, redacted in logs.
    pub secret_param: &'static str,
}

impl ProviderQuery {
    /// Look up a parameter value by name.
    #[cfg(test)]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The full request URL with URL-encoded parameters.
    pub fn to_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        url
    }

    /// The full request URL with the credential replaced, safe for logging.
    pub fn redacted_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.parameters.iter().map(|(k, v)| {
            if k == self.secret_param {
                (k.as_str(), "***")
            } else {
                (k.as_str(), v.as_str())
            }
        }));
        url
    }
}

/// An article as reported by a provider, before normalization.
///
/// Every field is optional: provider payloads are read defensively and
/// defaults are applied by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source_name: Option<String>,
    pub published_at: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
}

/// A normalized article handed to renderers.
///
/// Every field is always populated so renderers never have to deal with
/// missing values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Headline, copied from the provider.
    pub title: String,
    /// Display label of the requested category (e.g. "AI & ML").
    pub category: String,
    /// Short description, or a placeholder.
    pub summary: String,
    /// Name of the publishing outlet.
    pub source: String,
    /// Localized calendar date of publication, or a placeholder.
    pub date: String,
    /// Canonical article URL.
    pub url: String,
    /// Image URL, or a placeholder image.
    pub image: String,
}
