//! Core machinery behind the portfolio page: the scroll-snap carousel
//! engine, the navigation router with its page-view tracker, the project
//! manifest loader, and the image preload pipeline.
//!
//! Everything here is host-agnostic: the egui shell in `apps/desktop_gui`
//! feeds geometry and input in and renders the resulting state out.

pub mod analytics;
pub mod carousel;
pub mod images;
pub mod loader;
pub mod navigation;

pub use analytics::{
    flush, AnalyticsClient, AnalyticsConfig, AnalyticsError, CollectorTransport, CommandQueue,
    HttpCollector, PageViewHit, PageViewTracker, TrackerCommand, TrackerState,
};
pub use carousel::{
    ArrowKey, Axis, BoundaryState, Carousel, CarouselEngine, CarouselHandle, CarouselNext,
    CarouselOptions, CarouselPrevious, CarouselScope, CarouselScopeError, EngineSignal,
    ListenerId, Orientation, SnapAlign,
};
pub use images::{
    decode_preview, fetch_preview, placeholder, preload_or_placeholder, ImageError, PreviewImage,
};
pub use loader::{LoadState, LoaderError, ProjectLoader};
pub use navigation::{
    HistoryEntry, NavigationKind, NavigationObserver, ObserverId, RouteChange, Router,
};

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod http_tests;
