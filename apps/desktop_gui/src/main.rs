use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod config;
mod controller;
mod ui;
mod worker;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::PortfolioApp;

/// Personal portfolio desktop shell.
#[derive(Debug, Parser)]
#[command(name = "folio", version)]
struct Args {
    /// Remote project manifest URL; omit to render the built-in site data.
    #[arg(long)]
    projects_url: Option<String>,
    /// Analytics site id override.
    #[arg(long)]
    site_id: Option<String>,
    /// Analytics collector base URL override.
    #[arg(long)]
    collector_url: Option<String>,
    /// Disable analytics tracking entirely.
    #[arg(long)]
    no_analytics: bool,
}

impl Args {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            projects_url: self.projects_url.clone(),
            site_id: self.site_id.clone(),
            collector_url: self.collector_url.clone(),
            no_analytics: self.no_analytics,
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let settings = config::load_settings(&args.overrides());
    tracing::info!(
        projects_url = settings.projects_url.as_deref().unwrap_or("<built-in>"),
        analytics_enabled = settings.analytics_enabled,
        "starting portfolio shell"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Jacco's Portfolio")
            .with_inner_size([1180.0, 820.0])
            .with_min_inner_size([900.0, 620.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Jacco's Portfolio",
        options,
        Box::new(move |_cc| Ok(Box::new(PortfolioApp::new(cmd_tx, ui_rx, settings)))),
    )
}
