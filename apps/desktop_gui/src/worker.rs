//! Backend worker: owns the tokio runtime on a dedicated thread and
//! services UI commands (manifest loads, image fetches, analytics drains).

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use ui_core::analytics::{flush, CommandQueue, HttpCollector};
use ui_core::images::fetch_preview;
use ui_core::loader::ProjectLoader;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Startup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let http = reqwest::Client::new();
            let loader = settings
                .manifest_url()
                .map(|url| ProjectLoader::new(http.clone(), url));
            let collector = settings.analytics_config().and_then(|config| {
                match HttpCollector::new(http.clone(), &config) {
                    Ok(collector) => Some(collector),
                    Err(err) => {
                        tracing::warn!("analytics disabled: {err}");
                        None
                    }
                }
            });
            let analytics_queue = CommandQueue::global();

            let _ = ui_tx.try_send(UiEvent::Info("Background worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadProjects { force } => {
                        let Some(loader) = loader.as_ref() else {
                            // No remote manifest configured; the shell
                            // renders the built-in data.
                            continue;
                        };
                        if force {
                            loader.invalidate();
                        }
                        let Some(_in_flight) = loader.try_begin() else {
                            tracing::debug!("project load already in flight");
                            continue;
                        };
                        match loader.fetch_projects().await {
                            Ok(projects) => {
                                let _ = ui_tx.try_send(UiEvent::ProjectsLoaded(projects));
                            }
                            Err(err) => {
                                tracing::error!("error loading projects: {err}");
                                let _ = ui_tx.try_send(UiEvent::ProjectsFailed {
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                    BackendCommand::FetchProjectImage { index, url } => {
                        match fetch_preview(&http, &url).await {
                            Ok(image) => {
                                let _ = ui_tx.try_send(UiEvent::ImageLoaded { index, image });
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::ImageFailed {
                                    index,
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                    BackendCommand::SubmitAnalytics => {
                        if let Some(collector) = collector.as_ref() {
                            let submitted = flush(&analytics_queue, collector).await;
                            tracing::debug!(submitted, "analytics queue drained");
                        }
                    }
                }
            }

            tracing::info!("backend worker shutting down");
        });
    });
}
