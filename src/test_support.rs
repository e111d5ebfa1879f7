//! Scripted transports, probes and renderers shared by unit tests.

use crate::error::{PipelineError, TransportError};
use crate::feed::Renderer;
use crate::fetch::{ConnectivityProbe, Fetcher, RawResponse, Transport};
use crate::models::{Article, ProviderQuery, SearchRequest};
use crate::normalize::Normalizer;
use crate::pipeline::Pipeline;
use crate::providers::ProviderSettings;
use crate::providers::gnews::{DEFAULT_BASE_URL, Gnews};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
enum Script {
    Status(u16, String),
    Fail(TransportError),
    Hang,
    Gated,
}

/// A [`Transport`] that answers from a script instead of the network.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    script: Script,
    searches: Arc<Mutex<Vec<String>>>,
    gates: Arc<Mutex<HashMap<String, oneshot::Receiver<RawResponse>>>>,
}

impl ScriptedTransport {
    fn with(script: Script) -> Self {
        Self {
            script,
            searches: Arc::default(),
            gates: Arc::default(),
        }
    }

    /// Always answer with `status` and `body`.
    pub fn status(status: u16, body: &str) -> Self {
        Self::with(Script::Status(status, body.to_string()))
    }

    /// Always fail before a status is available.
    pub fn fail(error: TransportError) -> Self {
        Self::with(Script::Fail(error))
    }

    /// Never answer.
    pub fn hang() -> Self {
        Self::with(Script::Hang)
    }

    /// Answer each search only once its gate is opened.
    pub fn gated() -> Self {
        Self::with(Script::Gated)
    }

    /// Register a gate for `search`; sending on the returned channel releases it.
    pub fn gate(&self, search: &str) -> oneshot::Sender<RawResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(search.to_string(), rx);
        tx
    }

    /// The `q` parameter of every request issued so far.
    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn last_search(&self) -> Option<String> {
        self.searches.lock().unwrap().last().cloned()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, query: &ProviderQuery) -> Result<RawResponse, TransportError> {
        let search = query.param("q").unwrap_or_default().to_string();
        self.searches.lock().unwrap().push(search.clone());
        match &self.script {
            Script::Status(status, body) => Ok(ok_response(*status, body)),
            Script::Fail(e) => Err(e.clone()),
            Script::Hang => std::future::pending().await,
            Script::Gated => {
                let gate = self.gates.lock().unwrap().remove(&search);
                match gate {
                    Some(rx) => rx
                        .await
                        .map_err(|_| TransportError::Other("gate dropped".into())),
                    None => Err(TransportError::Other(format!("no gate for {search}"))),
                }
            }
        }
    }
}

pub fn ok_response(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

/// A [`ConnectivityProbe`] with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

impl ConnectivityProbe for StaticProbe {
    async fn is_online(&self) -> bool {
        self.0
    }
}

/// What a [`RecordingRenderer`] was asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Articles(SearchRequest, Vec<Article>),
    Error(SearchRequest, PipelineError),
}

/// A [`Renderer`] that remembers every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<Rendered>>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<Rendered> {
        self.calls.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn on_articles(&self, request: &SearchRequest, articles: &[Article]) {
        self.calls
            .lock()
            .unwrap()
            .push(Rendered::Articles(request.clone(), articles.to_vec()));
    }

    fn on_error(&self, request: &SearchRequest, error: &PipelineError) {
        self.calls
            .lock()
            .unwrap()
            .push(Rendered::Error(request.clone(), error.clone()));
    }
}

pub fn gnews_provider() -> Gnews {
    Gnews::new(
        DEFAULT_BASE_URL,
        ProviderSettings {
            api_key: "test-token".to_string(),
            language: "en".to_string(),
            max_results: 12,
        },
    )
    .unwrap()
}

pub fn gnews_query() -> ProviderQuery {
    use crate::providers::NewsProvider;
    gnews_provider().build_query("technology news")
}

pub fn pipeline(transport: ScriptedTransport) -> Pipeline<ScriptedTransport, StaticProbe> {
    Pipeline::new(
        Box::new(gnews_provider()),
        Fetcher::new(transport, StaticProbe(true), Duration::from_secs(5)),
        Normalizer::default(),
    )
}

/// A GNews body with two articles, one of them missing optional fields.
pub fn two_articles_body() -> String {
    articles_body(&["First headline", "Second headline"])
}

/// A GNews body with one article per title.
pub fn articles_body(titles: &[&str]) -> String {
    let articles: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            if i % 2 == 0 {
                serde_json::json!({
                    "title": title,
                    "description": format!("About {title}"),
                    "url": format!("https://example.com/{i}"),
                    "image": format!("https://example.com/{i}.png"),
                    "publishedAt": "2025-05-06T12:00:00Z",
                    "source": { "name": "Example Wire" }
                })
            } else {
                serde_json::json!({
                    "title": title,
                    "url": format!("https://example.com/{i}"),
                    "publishedAt": "2025-05-06T12:00:00Z",
                    "source": { "name": "Example Wire" }
                })
            }
        })
        .collect();
    serde_json::json!({ "totalArticles": titles.len(), "articles": articles }).to_string()
}
