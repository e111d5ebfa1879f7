//! # Tech News Feed
//!
//! A technology-news feed for the terminal. It queries a news search API
//! (GNews or NewsAPI), normalizes the articles into provider-independent
//! records and renders them as text cards and, optionally, JSON snapshots.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... tech_news_feed --category ai-ml
//! NEWS_API_KEY=... tech_news_feed -i -j ./feed
//! ```
//!
//! ## Architecture
//!
//! Every trigger runs the same pipeline:
//! 1. **Query building**: category or free text to a provider request
//! 2. **Fetching**: one GET under a timeout, classified into a body or an error
//! 3. **Normalization**: provider JSON to default-filled [`models::Article`]s
//!
//! The [`feed::FeedController`] owns the displayed state and makes sure only
//! the most recently requested search is ever rendered.

use clap::Parser;
use std::error::Error;
use tokio::io::BufReader;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod debounce;
mod error;
mod feed;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod providers;
mod query;
mod session;
#[cfg(test)]
mod test_support;
mod utils;

use cli::Cli;
use config::FeedConfig;
use feed::{DispatchOutcome, FeedController, FeedEvent, Renderer};
use fetch::{DnsProbe, Fetcher, HttpTransport};
use models::Category;
use normalize::Normalizer;
use outputs::{json::JsonSnapshotRenderer, terminal::TerminalRenderer};
use pipeline::Pipeline;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("tech_news_feed starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.category, ?args.query, interactive = args.interactive, "Parsed CLI arguments");

    // ---- Load config ----
    let mut config = match args.config.as_deref() {
        Some(path) => FeedConfig::load(path)?,
        None => FeedConfig::default(),
    };
    config.apply_cli(&args);
    config.validate()?;
    if config.api_key.as_deref().is_none_or(str::is_empty) {
        warn!("No API key configured; the provider will reject requests (set NEWS_API_KEY)");
    }
    if let Some(ref name) = args.category {
        if Category::parse(name) == Category::Unset {
            warn!(category = %name, "Unrecognized category; using the generic technology query");
        }
    }

    // ---- Renderers ----
    let mut renderers: Vec<Box<dyn Renderer>> = vec![Box::new(TerminalRenderer::stdout())];
    if let Some(ref dir) = args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
        renderers.push(Box::new(JsonSnapshotRenderer::new(dir)));
    }

    // ---- Pipeline ----
    let provider = providers::from_config(&config)?;
    let probe = DnsProbe::for_query(&provider.build_query(""));
    let fetcher = Fetcher::new(HttpTransport::new()?, probe, config.timeout());
    let pipeline = Pipeline::new(provider, fetcher, Normalizer::new(config.date_format.clone()));
    info!(
        provider = pipeline.provider_name(),
        timeout_ms = config.timeout_ms,
        "Pipeline ready"
    );

    let controller = FeedController::new(pipeline, renderers, config.default_category);

    if args.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        session::run(&controller, stdin, config.debounce()).await?;
        let state = controller.state();
        info!(
            category = %state.active_category,
            articles = state.articles.len(),
            "Session finished"
        );
        return Ok(());
    }

    let event = match args.query {
        Some(text) => FeedEvent::SearchTextChanged(text),
        None => FeedEvent::PageLoad,
    };
    match controller.dispatch(event).await {
        DispatchOutcome::Applied(Ok(count)) => {
            info!(count, "Feed rendered");
            Ok(())
        }
        DispatchOutcome::Applied(Err(e)) => Err(e.into()),
        DispatchOutcome::Superseded => Ok(()),
    }
}
