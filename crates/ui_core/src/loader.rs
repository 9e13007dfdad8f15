//! Project manifest loading with an explicit in-memory cache.
//!
//! The cache is owned by the loader and has exactly one invalidation rule:
//! `invalidate()`. Nothing expires on its own for the page's lifetime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use content::{Project, ProjectManifest};
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

/// Status line shown while the fetch is in flight.
pub const LOADING_MESSAGE: &str = "Loading projects...";
/// Status line for an empty (or failed-and-degraded) result set.
pub const NO_PROJECTS_MESSAGE: &str = "No projects found.";
/// Status line for a hard load failure.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load projects. Please try again later.";

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to fetch projects: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to fetch projects: status {0}")]
    Status(StatusCode),
    #[error("invalid project manifest: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What the projects section renders while data is arriving or absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(Vec<Project>),
    Empty,
    Failed(String),
}

impl LoadState {
    pub fn from_projects(projects: Vec<Project>) -> Self {
        if projects.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Ready(projects)
        }
    }

    /// Plain-text status for the section, `None` once cards are showing.
    pub fn status_message(&self) -> Option<&str> {
        match self {
            LoadState::Idle => None,
            LoadState::Loading => Some(LOADING_MESSAGE),
            LoadState::Ready(_) => None,
            LoadState::Empty => Some(NO_PROJECTS_MESSAGE),
            LoadState::Failed(message) => Some(message),
        }
    }
}

pub struct ProjectLoader {
    http: reqwest::Client,
    manifest_url: Url,
    cache: Mutex<Option<Vec<Project>>>,
    in_flight: AtomicBool,
}

/// Held while a fetch is running; releases the in-flight flag on drop.
pub struct InFlightGuard<'a> {
    loader: &'a ProjectLoader,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.loader.in_flight.store(false, Ordering::Release);
    }
}

impl ProjectLoader {
    pub fn new(http: reqwest::Client, manifest_url: Url) -> Self {
        Self {
            http,
            manifest_url,
            cache: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn manifest_url(&self) -> &Url {
        &self.manifest_url
    }

    /// Claims the in-flight slot. Returns `None` while another load is
    /// running, preventing overlapping fetches of the same manifest.
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { loader: self })
    }

    pub fn cached(&self) -> Option<Vec<Project>> {
        self.lock_cache().clone()
    }

    pub fn invalidate(&self) {
        *self.lock_cache() = None;
    }

    /// Fetches the manifest with cache-bypassing headers, or serves the
    /// in-memory cache when the manifest was already loaded this session.
    pub async fn fetch_projects(&self) -> Result<Vec<Project>, LoaderError> {
        if let Some(cached) = self.cached() {
            debug!(count = cached.len(), "serving projects from cache");
            return Ok(cached);
        }

        let response = self
            .http
            .get(self.manifest_url.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status(status));
        }

        let body = response.bytes().await?;
        let manifest: ProjectManifest = serde_json::from_slice(&body)?;

        *self.lock_cache() = Some(manifest.projects.clone());
        debug!(count = manifest.projects.len(), "project manifest loaded");
        Ok(manifest.projects)
    }

    /// The degraded path: any load error is logged and collapses to an
    /// empty project list, which the section renders as "No projects
    /// found." instead of crashing.
    pub async fn load_or_empty(&self) -> Vec<Project> {
        match self.fetch_projects().await {
            Ok(projects) => projects,
            Err(err) => {
                error!("error loading projects: {err}");
                Vec::new()
            }
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<Vec<Project>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
