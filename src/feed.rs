//! The feed controller: event dispatch, feed state and result ordering.
//!
//! Every user-facing trigger is a [`FeedEvent`]. The controller turns the
//! event into a [`SearchRequest`], runs the pipeline and hands the outcome to
//! a [`Renderer`].
//!
//! # Ordering
//!
//! Runs may overlap (a search typed while a category is still loading).
//! Each dispatch takes a sequence number from a monotonically increasing
//! counter; when a run settles its result is applied only if no newer
//! dispatch has been issued since. Superseded results are dropped without
//! rendering, so the feed always reflects the most recently requested search.

use crate::error::PipelineError;
use crate::fetch::{ConnectivityProbe, Transport};
use crate::models::{Article, Category, SearchRequest};
use crate::pipeline::Pipeline;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument};

/// Consumer of pipeline outcomes.
pub trait Renderer {
    /// Show a fresh set of articles, replacing whatever was displayed.
    fn on_articles(&self, request: &SearchRequest, articles: &[Article]);

    /// Show an error panel; `request` is what a retry re-issues.
    fn on_error(&self, request: &SearchRequest, error: &PipelineError);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn on_articles(&self, request: &SearchRequest, articles: &[Article]) {
        (**self).on_articles(request, articles)
    }

    fn on_error(&self, request: &SearchRequest, error: &PipelineError) {
        (**self).on_error(request, error)
    }
}

impl<R: Renderer> Renderer for Vec<R> {
    fn on_articles(&self, request: &SearchRequest, articles: &[Article]) {
        for r in self {
            r.on_articles(request, articles);
        }
    }

    fn on_error(&self, request: &SearchRequest, error: &PipelineError) {
        for r in self {
            r.on_error(request, error);
        }
    }
}

/// A user-facing trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Initial load with the default category.
    PageLoad,
    /// A category was picked; free text is cleared.
    CategorySelected(Category),
    /// Debounced search text under the active category.
    SearchTextChanged(String),
    /// Re-issue a previously displayed request verbatim.
    RetryRequested(SearchRequest),
}

/// What happened to a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The result was rendered.
    Applied(Result<usize, PipelineError>),
    /// A newer dispatch was issued before this one settled; nothing rendered.
    Superseded,
}

/// The only mutable UI state.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub active_category: Category,
    pub articles: Vec<Article>,
    pub displayed_request: Option<SearchRequest>,
    pub displayed_error: Option<PipelineError>,
}

pub struct FeedController<T, C, R> {
    pipeline: Pipeline<T, C>,
    renderer: R,
    default_category: Category,
    issued: AtomicU64,
    state: Mutex<FeedState>,
}

impl<T, C, R> FeedController<T, C, R>
where
    T: Transport,
    C: ConnectivityProbe,
    R: Renderer,
{
    pub fn new(pipeline: Pipeline<T, C>, renderer: R, default_category: Category) -> Self {
        Self {
            pipeline,
            renderer,
            default_category,
            issued: AtomicU64::new(0),
            state: Mutex::new(FeedState {
                active_category: default_category,
                ..FeedState::default()
            }),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A copy of the current feed state.
    pub fn state(&self) -> FeedState {
        self.lock_state().clone()
    }

    /// The request behind whatever is currently displayed, for retries.
    pub fn displayed_request(&self) -> Option<SearchRequest> {
        self.lock_state().displayed_request.clone()
    }

    /// Map an event to the request it issues, updating the active category.
    fn request_for(&self, event: FeedEvent) -> SearchRequest {
        let mut state = self.lock_state();
        match event {
            FeedEvent::PageLoad => {
                state.active_category = self.default_category;
                SearchRequest::for_category(self.default_category)
            }
            FeedEvent::CategorySelected(category) => {
                state.active_category = category;
                SearchRequest::for_category(category)
            }
            FeedEvent::SearchTextChanged(text) => {
                SearchRequest::new(state.active_category, Some(text))
            }
            FeedEvent::RetryRequested(request) => request,
        }
    }

    /// Handle one event end to end.
    #[instrument(level = "info", skip(self))]
    pub async fn dispatch(&self, event: FeedEvent) -> DispatchOutcome {
        let request = self.request_for(event);
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, %request, "Dispatching search");

        let result = self.pipeline.run(&request).await;
        self.apply(seq, request, result)
    }

    fn apply(
        &self,
        seq: u64,
        request: SearchRequest,
        result: Result<Vec<Article>, PipelineError>,
    ) -> DispatchOutcome {
        let mut state = self.lock_state();
        let latest = self.issued.load(Ordering::SeqCst);
        if seq != latest {
            debug!(seq, latest, %request, "Discarding superseded result");
            return DispatchOutcome::Superseded;
        }

        match result {
            Ok(articles) => {
                info!(seq, count = articles.len(), %request, "Rendering articles");
                self.renderer.on_articles(&request, &articles);
                let count = articles.len();
                state.articles = articles;
                state.displayed_error = None;
                state.displayed_request = Some(request);
                DispatchOutcome::Applied(Ok(count))
            }
            Err(error) => {
                info!(seq, kind = error.kind(), %request, "Rendering error panel");
                self.renderer.on_error(&request, &error);
                state.articles.clear();
                state.displayed_error = Some(error.clone());
                state.displayed_request = Some(request);
                DispatchOutcome::Applied(Err(error))
            }
        }
    }
}
