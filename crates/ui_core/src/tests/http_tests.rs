use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router as AxumRouter,
};
use tokio::net::TcpListener;
use url::Url;

use crate::analytics::{flush, AnalyticsConfig, CommandQueue, CollectorTransport, HttpCollector};
use crate::loader::{LoaderError, ProjectLoader};

const LEGACY_MANIFEST: &str = r#"{
    "projects": [
        {
            "title": "Personal Blog",
            "description": "A minimalist blog.",
            "imageUrl": "/images/project1.jpg",
            "projectUrl": "https://example.com/blog"
        },
        {
            "title": "Weather Dashboard",
            "description": "Forecasts from a public API.",
            "imageUrl": "/images/project2.jpg",
            "projectUrl": "https://example.com/weather"
        },
        {
            "title": "Task Manager",
            "description": "Drag-and-drop task organizing.",
            "imageUrl": "/images/project3.jpg",
            "projectUrl": "https://example.com/tasks"
        }
    ]
}"#;

async fn serve(app: AxumRouter) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    Url::parse(&format!("http://{addr}/")).expect("server url")
}

#[derive(Clone, Default)]
struct ManifestServerState {
    requests: Arc<AtomicUsize>,
    cache_control: Arc<Mutex<Vec<String>>>,
}

async fn manifest_handler(
    State(state): State<ManifestServerState>,
    headers: HeaderMap,
) -> ([(&'static str, &'static str); 1], String) {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let cache_control = headers
        .get("cache-control")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state
        .cache_control
        .lock()
        .expect("header log")
        .push(cache_control);
    ([("content-type", "application/json")], LEGACY_MANIFEST.to_string())
}

#[tokio::test]
async fn fetch_projects_sends_cache_bypass_headers_and_parses_the_manifest() {
    let state = ManifestServerState::default();
    let app = AxumRouter::new()
        .route("/projects.json", get(manifest_handler))
        .with_state(state.clone());
    let base = serve(app).await;

    let loader = ProjectLoader::new(
        reqwest::Client::new(),
        base.join("projects.json").expect("manifest url"),
    );
    let projects = loader.fetch_projects().await.expect("manifest loads");

    assert_eq!(projects.len(), 3);
    assert_eq!(projects[0].title, "Personal Blog");
    assert_eq!(projects[0].image, "/images/project1.jpg");
    assert_eq!(projects[0].link.as_deref(), Some("https://example.com/blog"));
    assert_eq!(
        state.cache_control.lock().expect("header log").as_slice(),
        ["no-cache"]
    );
}

#[tokio::test]
async fn repeated_fetches_hit_the_cache_until_invalidated() {
    let state = ManifestServerState::default();
    let app = AxumRouter::new()
        .route("/projects.json", get(manifest_handler))
        .with_state(state.clone());
    let base = serve(app).await;

    let loader = ProjectLoader::new(
        reqwest::Client::new(),
        base.join("projects.json").expect("manifest url"),
    );

    loader.fetch_projects().await.expect("first load");
    loader.fetch_projects().await.expect("cached load");
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
    assert!(loader.cached().is_some());

    loader.invalidate();
    assert!(loader.cached().is_none());
    loader.fetch_projects().await.expect("reload");
    assert_eq!(state.requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn server_errors_degrade_to_an_empty_project_list() {
    let app = AxumRouter::new().route(
        "/projects.json",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = serve(app).await;

    let loader = ProjectLoader::new(
        reqwest::Client::new(),
        base.join("projects.json").expect("manifest url"),
    );

    assert!(matches!(
        loader.fetch_projects().await,
        Err(LoaderError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    ));
    assert!(loader.load_or_empty().await.is_empty());
    assert!(loader.cached().is_none());
}

#[tokio::test]
async fn malformed_manifests_degrade_to_an_empty_project_list() {
    let app = AxumRouter::new().route("/projects.json", get(|| async { "this is not json" }));
    let base = serve(app).await;

    let loader = ProjectLoader::new(
        reqwest::Client::new(),
        base.join("projects.json").expect("manifest url"),
    );

    assert!(matches!(
        loader.fetch_projects().await,
        Err(LoaderError::Decode(_))
    ));
    assert!(loader.load_or_empty().await.is_empty());
}

#[tokio::test]
async fn unreachable_hosts_degrade_to_an_empty_project_list() {
    // Bind and immediately drop a listener so the port actively refuses.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let loader = ProjectLoader::new(
        reqwest::Client::new(),
        Url::parse(&format!("http://{addr}/projects.json")).expect("dead url"),
    );

    assert!(matches!(
        loader.fetch_projects().await,
        Err(LoaderError::Http(_))
    ));
    assert!(loader.load_or_empty().await.is_empty());
}

#[derive(Clone, Default)]
struct CollectorServerState {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn collector_handler(
    State(state): State<CollectorServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    state.queries.lock().expect("query log").push(params);
    StatusCode::ACCEPTED
}

#[tokio::test]
async fn http_collector_submits_page_views_with_tracking_parameters() {
    let state = CollectorServerState::default();
    let app = AxumRouter::new()
        .route("/ppms.php", get(collector_handler))
        .with_state(state.clone());
    let base = serve(app).await;

    let config = AnalyticsConfig::new(
        crate::analytics::DEFAULT_SITE_ID,
        base.as_str(),
    )
    .expect("test config");
    let collector =
        HttpCollector::new(reqwest::Client::new(), &config).expect("collector endpoint");
    assert!(collector.endpoint().as_str().ends_with("/ppms.php"));

    let queue = CommandQueue::default();
    queue.push_page_view("/", "Jacco's Portfolio");
    queue.push_page_view("/projects", "Projects | Jacco's Portfolio");

    let drained = flush(&queue, &collector).await;
    assert_eq!(drained, 2);

    let queries = state.queries.lock().expect("query log").clone();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0]["idsite"], crate::analytics::DEFAULT_SITE_ID);
    assert_eq!(queries[0]["rec"], "1");
    assert_eq!(queries[0]["url"], "/");
    assert_eq!(queries[1]["url"], "/projects");
    assert_eq!(queries[1]["action_name"], "Projects | Jacco's Portfolio");
}

#[tokio::test]
async fn collector_failures_never_reach_the_caller() {
    let app = AxumRouter::new().route(
        "/ppms.php",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let base = serve(app).await;

    let config =
        AnalyticsConfig::new(crate::analytics::DEFAULT_SITE_ID, base.as_str()).expect("config");
    let collector =
        HttpCollector::new(reqwest::Client::new(), &config).expect("collector endpoint");

    let queue = CommandQueue::default();
    queue.push_page_view("/", "Jacco's Portfolio");

    // flush swallows the submission failure and still drains the queue.
    let drained = flush(&queue, &collector).await;
    assert_eq!(drained, 1);
    assert!(queue.is_empty());

    let hit = crate::analytics::PageViewHit {
        url: "/".to_string(),
        title: "Jacco's Portfolio".to_string(),
    };
    assert!(collector.submit(&hit).await.is_err());
}
