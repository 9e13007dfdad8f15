//! Piwik-style page-view analytics: a process-wide command queue, the
//! client that feeds it, transports that drain it towards the collector,
//! and the tracker component that observes the router.
//!
//! Tracking is fire-and-forget. Nothing in this module is allowed to
//! interrupt rendering or navigation; failures are logged and swallowed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::navigation::{NavigationObserver, ObserverId, RouteChange, Router};

/// Deployment defaults for this site.
pub const DEFAULT_SITE_ID: &str = "3ed68300-fe82-42f6-9f7d-7598f06f6d74";
pub const DEFAULT_COLLECTOR_URL: &str = "https://jacco.containers.piwik.pro";
/// Title recorded when the current document title is empty.
pub const DEFAULT_PAGE_TITLE: &str = "Jacco's Portfolio";

const TRACKING_ENDPOINT_PATH: &str = "ppms.php";

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid analytics site id '{value}': {source}")]
    InvalidSiteId {
        value: String,
        #[source]
        source: uuid::Error,
    },
    #[error("invalid collector url '{value}': {source}")]
    InvalidCollectorUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub site_id: Uuid,
    pub collector_url: Url,
}

impl AnalyticsConfig {
    pub fn new(site_id: &str, collector_url: &str) -> Result<Self, AnalyticsError> {
        let site_id = Uuid::parse_str(site_id).map_err(|source| AnalyticsError::InvalidSiteId {
            value: site_id.to_string(),
            source,
        })?;
        let collector_url =
            Url::parse(collector_url).map_err(|source| AnalyticsError::InvalidCollectorUrl {
                value: collector_url.to_string(),
                source,
            })?;
        Ok(Self {
            site_id,
            collector_url,
        })
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_ID, DEFAULT_COLLECTOR_URL)
            .unwrap_or_else(|err| unreachable!("built-in analytics defaults parse: {err}"))
    }
}

/// One tracking command, in the order the collector expects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCommand {
    SetCustomUrl(String),
    SetDocumentTitle(String),
    TrackPageView,
}

/// A completed page view folded out of one command triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageViewHit {
    pub url: String,
    pub title: String,
}

static COMMAND_QUEUE: OnceLock<Arc<CommandQueue>> = OnceLock::new();

/// The `_paq` analogue. There is exactly one per execution context;
/// `global()` creates it on first use and is idempotent after that.
#[derive(Default)]
pub struct CommandQueue {
    commands: Mutex<VecDeque<TrackerCommand>>,
}

impl CommandQueue {
    pub fn global() -> Arc<CommandQueue> {
        Arc::clone(COMMAND_QUEUE.get_or_init(|| Arc::new(CommandQueue::default())))
    }

    /// Queues the fixed triple for one page view under a single lock, so
    /// concurrent producers cannot interleave partial triples.
    pub fn push_page_view(&self, url: &str, title: &str) {
        let mut commands = self.lock();
        commands.push_back(TrackerCommand::SetCustomUrl(url.to_string()));
        commands.push_back(TrackerCommand::SetDocumentTitle(title.to_string()));
        commands.push_back(TrackerCommand::TrackPageView);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<TrackerCommand> {
        self.lock().iter().cloned().collect()
    }

    /// Drains queued commands into completed hits, preserving navigation
    /// order. A `TrackPageView` without a full prefix is dropped with a
    /// warning rather than guessed at.
    pub fn drain_hits(&self) -> Vec<PageViewHit> {
        let mut commands = self.lock();
        let mut hits = Vec::new();
        let mut url = None;
        let mut title = None;
        for command in commands.drain(..) {
            match command {
                TrackerCommand::SetCustomUrl(value) => url = Some(value),
                TrackerCommand::SetDocumentTitle(value) => title = Some(value),
                TrackerCommand::TrackPageView => match (url.take(), title.take()) {
                    (Some(url), Some(title)) => hits.push(PageViewHit { url, title }),
                    _ => warn!("dropping page view with an incomplete command prefix"),
                },
            }
        }
        hits
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<TrackerCommand>> {
        self.commands.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Produces tracking commands. Cheap to clone; clones share the queue.
#[derive(Clone)]
pub struct AnalyticsClient {
    config: AnalyticsConfig,
    queue: Arc<CommandQueue>,
}

impl AnalyticsClient {
    /// One-time client setup against the process-wide queue. Calling this
    /// twice yields two clients over the same queue, never a second queue.
    pub fn initialize(config: AnalyticsConfig) -> Self {
        debug!(site_id = %config.site_id, collector = %config.collector_url, "analytics initialized");
        Self {
            config,
            queue: CommandQueue::global(),
        }
    }

    /// Client over an explicit queue; used by tests and embedded setups.
    pub fn with_queue(config: AnalyticsConfig, queue: Arc<CommandQueue>) -> Self {
        Self { config, queue }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn queue(&self) -> Arc<CommandQueue> {
        Arc::clone(&self.queue)
    }

    /// Queues one page view. Never fails and never panics; an empty title
    /// falls back to the site default.
    pub fn track_page_view(&self, path: &str, title: &str) {
        let title = if title.trim().is_empty() {
            DEFAULT_PAGE_TITLE
        } else {
            title
        };
        self.queue.push_page_view(path, title);
        debug!(path, title, "tracked page view");
    }
}

/// Carries drained hits to the collector.
#[async_trait]
pub trait CollectorTransport: Send + Sync {
    async fn submit(&self, hit: &PageViewHit) -> anyhow::Result<()>;
}

/// Production transport: GET against the collector's `ppms.php` endpoint.
pub struct HttpCollector {
    http: reqwest::Client,
    endpoint: Url,
    site_id: Uuid,
}

impl HttpCollector {
    pub fn new(http: reqwest::Client, config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        let endpoint = config.collector_url.join(TRACKING_ENDPOINT_PATH).map_err(|source| {
            AnalyticsError::InvalidCollectorUrl {
                value: config.collector_url.to_string(),
                source,
            }
        })?;
        Ok(Self {
            http,
            endpoint,
            site_id: config.site_id,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CollectorTransport for HttpCollector {
    async fn submit(&self, hit: &PageViewHit) -> anyhow::Result<()> {
        self.http
            .get(self.endpoint.clone())
            .query(&[
                ("idsite", self.site_id.to_string()),
                ("rec", "1".to_string()),
                ("url", hit.url.clone()),
                ("action_name", hit.title.clone()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Drains the queue and submits every hit in order. Fire-and-forget: a
/// failed submission is logged and dropped, later hits still go out.
pub async fn flush(queue: &CommandQueue, transport: &dyn CollectorTransport) -> usize {
    let hits = queue.drain_hits();
    let drained = hits.len();
    for hit in hits {
        match transport.submit(&hit).await {
            Ok(()) => debug!(url = %hit.url, "page view submitted"),
            Err(err) => warn!(url = %hit.url, "page view submission failed: {err:#}"),
        }
    }
    drained
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Uninitialized,
    Active,
}

struct TrackerObserver {
    client: AnalyticsClient,
}

impl NavigationObserver for TrackerObserver {
    fn route_changed(&self, change: &RouteChange) {
        self.client.track_page_view(&change.path, &change.title);
    }
}

/// The tracker component: on mount it records the initial page view and
/// subscribes to the router; every later route change converges on the same
/// `track_page_view` path. Teardown is unconditional so a remount starts
/// from a clean slate. Mounting two trackers double-tracks, as the original
/// deployment would; the queue itself stays single.
pub struct PageViewTracker {
    client: AnalyticsClient,
    observer: Arc<TrackerObserver>,
    subscription: Option<ObserverId>,
}

impl PageViewTracker {
    pub fn new(client: AnalyticsClient) -> Self {
        let observer = Arc::new(TrackerObserver {
            client: client.clone(),
        });
        Self {
            client,
            observer,
            subscription: None,
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.subscription.is_some() {
            TrackerState::Active
        } else {
            TrackerState::Uninitialized
        }
    }

    /// Uninitialized -> Active: records the initial page view, then starts
    /// observing route changes. A second mount of the same component is a
    /// no-op.
    pub fn mount(&mut self, router: &mut Router) {
        if self.subscription.is_some() {
            warn!("page view tracker mounted twice; ignoring");
            return;
        }
        let initial = router.current().clone();
        self.client.track_page_view(&initial.path, &initial.title);
        self.subscription = Some(router.subscribe(self.observer.clone() as Arc<dyn NavigationObserver>));
    }

    /// Active -> Uninitialized: stops observing. Safe to call when already
    /// torn down.
    pub fn teardown(&mut self, router: &mut Router) {
        if let Some(id) = self.subscription.take() {
            router.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryEntry;
    use std::sync::Mutex as StdMutex;

    fn test_client() -> AnalyticsClient {
        AnalyticsClient::with_queue(
            AnalyticsConfig::default(),
            Arc::new(CommandQueue::default()),
        )
    }

    #[derive(Default)]
    struct RecordingTransport {
        hits: StdMutex<Vec<PageViewHit>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn failing() -> Self {
            Self {
                hits: StdMutex::new(Vec::new()),
                fail: true,
            }
        }

        fn hits(&self) -> Vec<PageViewHit> {
            self.hits.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl CollectorTransport for RecordingTransport {
        async fn submit(&self, hit: &PageViewHit) -> anyhow::Result<()> {
            self.hits
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(hit.clone());
            if self.fail {
                anyhow::bail!("collector unreachable");
            }
            Ok(())
        }
    }

    #[test]
    fn track_page_view_queues_the_fixed_command_triple() {
        let client = test_client();
        client.track_page_view("/projects", "Projects | Jacco's Portfolio");

        assert_eq!(
            client.queue().snapshot(),
            vec![
                TrackerCommand::SetCustomUrl("/projects".to_string()),
                TrackerCommand::SetDocumentTitle("Projects | Jacco's Portfolio".to_string()),
                TrackerCommand::TrackPageView,
            ]
        );
    }

    #[test]
    fn empty_title_falls_back_to_the_site_default() {
        let client = test_client();
        client.track_page_view("/", "  ");

        let hits = client.queue().drain_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, DEFAULT_PAGE_TITLE);
    }

    #[test]
    fn global_queue_initialization_is_idempotent() {
        let first = CommandQueue::global();
        let second = CommandQueue::global();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn n_route_mutations_yield_n_plus_one_hits_in_order() {
        let client = test_client();
        let queue = client.queue();
        let mut tracker = PageViewTracker::new(client);
        let mut router = Router::new(HistoryEntry::new("/", "Jacco's Portfolio"));

        tracker.mount(&mut router);
        assert_eq!(tracker.state(), TrackerState::Active);

        router.push(HistoryEntry::new("/projects", "Projects"));
        router.push(HistoryEntry::new("/skills", "Skills"));
        router.back();

        let hits = queue.drain_hits();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].url, "/");
        assert_eq!(hits[1].url, "/projects");
        assert_eq!(hits[2].url, "/skills");
        assert_eq!(hits[3].url, "/projects");
    }

    #[test]
    fn repeated_navigations_are_not_coalesced() {
        let client = test_client();
        let queue = client.queue();
        let mut tracker = PageViewTracker::new(client);
        let mut router = Router::new(HistoryEntry::new("/", ""));
        tracker.mount(&mut router);

        router.push(HistoryEntry::new("/projects", "Projects"));
        router.replace(HistoryEntry::new("/projects", "Projects"));

        assert_eq!(queue.drain_hits().len(), 3);
    }

    #[test]
    fn teardown_unsubscribes_and_stops_tracking() {
        let client = test_client();
        let queue = client.queue();
        let mut tracker = PageViewTracker::new(client);
        let mut router = Router::new(HistoryEntry::new("/", "Jacco's Portfolio"));

        tracker.mount(&mut router);
        assert_eq!(router.observer_count(), 1);

        tracker.teardown(&mut router);
        assert_eq!(router.observer_count(), 0);
        assert_eq!(tracker.state(), TrackerState::Uninitialized);

        queue.drain_hits();
        router.push(HistoryEntry::new("/projects", "Projects"));
        assert!(queue.is_empty());

        // A fresh mount starts over with a new initial page view.
        tracker.mount(&mut router);
        assert_eq!(tracker.state(), TrackerState::Active);
        assert_eq!(queue.drain_hits().len(), 1);
    }

    #[test]
    fn double_mounting_one_component_is_ignored_but_two_components_double_track() {
        let client = test_client();
        let queue = client.queue();
        let mut router = Router::new(HistoryEntry::new("/", "Jacco's Portfolio"));

        let mut tracker = PageViewTracker::new(client.clone());
        tracker.mount(&mut router);
        tracker.mount(&mut router);
        assert_eq!(router.observer_count(), 1);
        assert_eq!(queue.drain_hits().len(), 1);

        // The documented sharp edge: a second component instance doubles
        // every subsequent navigation.
        let mut second = PageViewTracker::new(client);
        second.mount(&mut router);
        queue.drain_hits();
        router.push(HistoryEntry::new("/projects", "Projects"));
        assert_eq!(queue.drain_hits().len(), 2);
    }

    #[test]
    fn incomplete_command_prefixes_are_dropped() {
        let queue = CommandQueue::default();
        {
            let mut commands = queue.lock();
            commands.push_back(TrackerCommand::TrackPageView);
        }
        queue.push_page_view("/", "Home");

        let hits = queue.drain_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "/");
    }

    #[tokio::test]
    async fn flush_submits_in_order_and_swallows_transport_failures() {
        let queue = CommandQueue::default();
        queue.push_page_view("/", "Home");
        queue.push_page_view("/projects", "Projects");

        let transport = RecordingTransport::failing();
        let drained = flush(&queue, &transport).await;

        assert_eq!(drained, 2);
        assert!(queue.is_empty());
        let hits = transport.hits();
        assert_eq!(hits[0].url, "/");
        assert_eq!(hits[1].url, "/projects");
    }

    #[test]
    fn config_rejects_malformed_site_id_and_collector() {
        assert!(matches!(
            AnalyticsConfig::new("not-a-uuid", DEFAULT_COLLECTOR_URL),
            Err(AnalyticsError::InvalidSiteId { .. })
        ));
        assert!(matches!(
            AnalyticsConfig::new(DEFAULT_SITE_ID, "::not a url::"),
            Err(AnalyticsError::InvalidCollectorUrl { .. })
        ));
    }
}
