//! Backend commands queued from UI to backend worker.

use url::Url;

pub enum BackendCommand {
    LoadProjects {
        force: bool,
    },
    FetchProjectImage {
        index: usize,
        url: Url,
    },
    /// Drain the analytics command queue towards the collector.
    SubmitAnalytics,
}
