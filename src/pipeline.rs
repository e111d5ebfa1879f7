//! The fetch-and-normalize pipeline.
//!
//! `run(request) = normalize(fetch(build(request)))`. The pipeline holds no
//! mutable state, so overlapping runs never interfere with each other; only
//! the order in which their results are applied matters, which is the feed
//! controller's concern.

use crate::error::PipelineError;
use crate::fetch::{ConnectivityProbe, Fetcher, Transport};
use crate::models::{Article, SearchRequest};
use crate::normalize::Normalizer;
use crate::providers::NewsProvider;
use crate::query;
use std::time::Instant;
use tracing::{error, info, instrument};

pub struct Pipeline<T, C> {
    provider: Box<dyn NewsProvider + Send + Sync>,
    fetcher: Fetcher<T, C>,
    normalizer: Normalizer,
}

impl<T, C> Pipeline<T, C>
where
    T: Transport,
    C: ConnectivityProbe,
{
    pub fn new(
        provider: Box<dyn NewsProvider + Send + Sync>,
        fetcher: Fetcher<T, C>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            provider,
            fetcher,
            normalizer,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Run one search end to end.
    #[instrument(level = "info", skip_all, fields(request = %request))]
    pub async fn run(&self, request: &SearchRequest) -> Result<Vec<Article>, PipelineError> {
        let t0 = Instant::now();
        let query = query::build(self.provider.as_ref(), request);
        let result = match self.fetcher.fetch(&query).await {
            Ok(body) => self
                .normalizer
                .normalize(self.provider.as_ref(), &body, request.category),
            Err(e) => Err(e),
        };
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        match &result {
            Ok(articles) => info!(count = articles.len(), elapsed_ms, "Pipeline succeeded"),
            Err(e) => error!(kind = e.kind(), error = %e, elapsed_ms, "Pipeline failed"),
        }
        result
    }
}
