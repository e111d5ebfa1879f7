//! JSON snapshot output of the feed.
//!
//! Every rendered outcome is serialized to a file named after the request,
//! organized by date:
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── latest.json
//!     ├── ai-ml.json
//!     └── startups-quantum.json
//! ```
//!
//! A later outcome for the same request overwrites the earlier file.

use crate::error::PipelineError;
use crate::feed::Renderer;
use crate::models::{Article, SearchRequest};
use crate::utils::slugify;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// The error panel as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorPanel {
    pub kind: String,
    pub message: String,
    pub hint: Option<String>,
}

impl From<&PipelineError> for ErrorPanel {
    fn from(e: &PipelineError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
            hint: e.hint().map(str::to_string),
        }
    }
}

/// One rendered feed state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedSnapshot {
    /// Date of rendering in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Local time of rendering.
    pub local_time: String,
    /// Wire name of the requested category.
    pub category: String,
    /// Display label of the requested category.
    pub label: String,
    /// The search string sent to the provider.
    pub query: String,
    pub articles: Vec<Article>,
    pub error: Option<ErrorPanel>,
}

impl FeedSnapshot {
    fn new(request: &SearchRequest, articles: Vec<Article>, error: Option<ErrorPanel>) -> Self {
        let now = Local::now();
        Self {
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            category: request.category.as_str().to_string(),
            label: request.category.label().to_string(),
            query: request.effective_query().to_string(),
            articles,
            error,
        }
    }
}

/// File stem for a request, e.g. `startups-quantum`.
pub fn snapshot_stem(request: &SearchRequest) -> String {
    let mut stem = request.category.as_str().to_string();
    if let Some(text) = request.free_text.as_deref() {
        let slug = slugify(text);
        if !slug.is_empty() {
            stem.push('-');
            stem.push_str(&slug);
        }
    }
    stem
}

/// Write a snapshot to `{dir}/{date}/{stem}.json`, returning the path.
pub fn write_snapshot(
    dir: &Path,
    stem: &str,
    snapshot: &FeedSnapshot,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let date_dir = dir.join(&snapshot.local_date);
    fs::create_dir_all(&date_dir)?;
    let path = date_dir.join(format!("{}.json", stem));
    fs::write(&path, json)?;
    Ok(path)
}

/// Renderer that persists each outcome as a JSON snapshot.
///
/// Write failures are logged and never interrupt the feed.
#[derive(Debug, Clone)]
pub struct JsonSnapshotRenderer {
    dir: PathBuf,
}

impl JsonSnapshotRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn persist(&self, request: &SearchRequest, snapshot: FeedSnapshot) {
        let stem = snapshot_stem(request);
        match write_snapshot(&self.dir, &stem, &snapshot) {
            Ok(path) => info!(path = %path.display(), "Wrote JSON feed snapshot"),
            Err(e) => error!(dir = %self.dir.display(), error = %e, "Failed to write JSON feed snapshot"),
        }
    }
}

impl Renderer for JsonSnapshotRenderer {
    fn on_articles(&self, request: &SearchRequest, articles: &[Article]) {
        self.persist(request, FeedSnapshot::new(request, articles.to_vec(), None));
    }

    fn on_error(&self, request: &SearchRequest, error: &PipelineError) {
        self.persist(
            request,
            FeedSnapshot::new(request, Vec::new(), Some(ErrorPanel::from(error))),
        );
    }
}
