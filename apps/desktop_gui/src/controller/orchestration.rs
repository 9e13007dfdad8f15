//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut Option<String>,
) {
    let cmd_name = match &cmd {
        BackendCommand::LoadProjects { .. } => "load_projects",
        BackendCommand::FetchProjectImage { .. } => "fetch_project_image",
        BackendCommand::SubmitAnalytics => "submit_analytics",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = Some("Background work queue is full; please retry".to_string());
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = Some(
                "Background worker disconnected (possible startup failure); restart the app"
                    .to_string(),
            );
        }
    }
}
