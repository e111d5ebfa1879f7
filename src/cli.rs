//! Command-line interface definitions for Tech News Feed.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Flags override values from the optional YAML config file.

use crate::config::ProviderKind;
use clap::Parser;

/// Command-line arguments for the Tech News Feed application.
///
/// # Examples
///
/// ```sh
/// # Latest technology news from the default provider
/// tech_news_feed
///
/// # A category, or a free-text search within a category
/// tech_news_feed --category ai-ml
/// tech_news_feed --category startups -q quantum
///
/// # Interactive session writing JSON snapshots
/// tech_news_feed -i -j ./feed
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Category to fetch: latest, ai-ml, startups or innovations
    #[arg(long)]
    pub category: Option<String>,

    /// Free-text search; overrides the category's canned query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// News provider API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the provider's API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Fetch timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Read searches and commands from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Output directory for JSON feed snapshots
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}
