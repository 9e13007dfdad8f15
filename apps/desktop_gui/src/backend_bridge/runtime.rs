//! Runtime bridge between UI command queue and backend event intake.

use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::UiEvent;

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    crate::worker::spawn_backend_thread(settings, cmd_rx, ui_tx);
}
