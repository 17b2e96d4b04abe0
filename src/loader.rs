//! Client-side loading of the generated artifacts.
//!
//! A front-end fetches `/activity-data.json`, `/tag-data.json` and
//! `/visualization-stats.json` and renders nothing until they arrive. This
//! module models that fetch as a small state machine over an
//! [`ArtifactSource`], so the loading and error states can be exercised
//! without a browser:
//!
//! ```text
//!            load()               ok
//! Loading ───────────▶ fetching ───────▶ Ready
//!    ▲                    │
//!    │ retry()            │ transport error / non-2xx / bad JSON
//!    └──────────────── Failed { message, retryable }
//! ```
//!
//! The stats file is optional: failing to fetch it leaves `stats` empty
//! instead of failing the whole load.

use crate::generate::{ACTIVITY_FILE, STATS_FILE, TAGS_FILE};
use crate::types::{ActivityRecord, TagRecord, VisualizationStats};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// An HTTP-like response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Canonical reason phrase for the statuses a static host returns.
fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        304 => "Not Modified",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown Status",
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch {path}: {message}")]
    Transport { path: String, message: String },
    #[error("failed to load {path}: {status} {reason}")]
    Status {
        path: String,
        status: u16,
        reason: &'static str,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Transport and status failures may succeed on a second attempt;
    /// malformed artifacts will not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LoadError::Decode { .. })
    }
}

/// Where artifacts come from: a web server, a directory, a test double.
pub trait ArtifactSource {
    /// Fetch `path` (e.g. `/activity-data.json`).
    ///
    /// `Err` is a transport failure; an error status is an `Ok` response.
    fn fetch(&self, path: &str) -> Result<Response, LoadError>;
}

/// Serves artifacts from a directory the way a static host would: 200 for
/// a readable file, 404 for a missing one, 500 for anything else.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactSource for DirSource {
    fn fetch(&self, path: &str) -> Result<Response, LoadError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Ok(Response::new(404, ""));
        }
        match fs::read_to_string(self.root.join(relative)) {
            Ok(body) => Ok(Response::new(200, body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Response::new(404, "")),
            Err(e) => {
                warn!("{}: {e}", self.root.join(relative).display());
                Ok(Response::new(500, ""))
            }
        }
    }
}

/// Everything the visualizations render from.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub activity: Vec<ActivityRecord>,
    pub tags: Vec<TagRecord>,
    pub stats: Option<VisualizationStats>,
}

/// User-facing description of a failed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Artifacts),
    Failed(LoadFailure),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Fetch state for one page view.
#[derive(Debug)]
pub struct VisualizationData<S> {
    source: S,
    state: LoadState,
    attempts: u32,
}

impl<S: ArtifactSource> VisualizationData<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: LoadState::Loading,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Number of fetch attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Fetch all artifacts and settle into `Ready` or `Failed`.
    pub fn load(&mut self) -> &LoadState {
        self.state = LoadState::Loading;
        self.attempts += 1;
        self.state = match self.fetch_all() {
            Ok(artifacts) => LoadState::Ready(artifacts),
            Err(e) => {
                warn!("visualization data unavailable: {e}");
                LoadState::Failed(LoadFailure {
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                })
            }
        };
        &self.state
    }

    /// Re-run the same fetch. Only meaningful after a retryable failure;
    /// otherwise the current state is returned unchanged.
    pub fn retry(&mut self) -> &LoadState {
        if matches!(&self.state, LoadState::Failed(f) if f.retryable) {
            self.load()
        } else {
            &self.state
        }
    }

    fn fetch_all(&self) -> Result<Artifacts, LoadError> {
        let activity = self.fetch_json(&format!("/{ACTIVITY_FILE}"))?;
        let tags = self.fetch_json(&format!("/{TAGS_FILE}"))?;
        let stats = match self.fetch_json(&format!("/{STATS_FILE}")) {
            Ok(stats) => Some(stats),
            Err(e) => {
                debug!("stats unavailable: {e}");
                None
            }
        };
        Ok(Artifacts {
            activity,
            tags,
            stats,
        })
    }

    fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LoadError> {
        let response = self.source.fetch(path)?;
        if !response.is_success() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status,
                reason: status_text(response.status),
            });
        }
        serde_json::from_str(&response.body).map_err(|source| LoadError::Decode {
            path: path.to_string(),
            source,
        })
    }
}
