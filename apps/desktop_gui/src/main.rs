use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::bounded;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use backend_bridge::runtime;
use controller::events::UiEvent;
use ui::app::StudioApp;

/// Desktop client for the asynchronous content generation backend.
#[derive(Parser, Debug)]
#[command(name = "content-studio")]
struct Args {
    /// Backend base URL; overrides the settings file and STUDIO_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Directory for the settings file (defaults to the per-user data dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let settings_path = config::settings_path(args.data_dir.as_deref());
    let mut settings = config::load_settings(&settings_path);
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(settings.server_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Content Generation Studio")
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([840.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Content Generation Studio",
        options,
        Box::new(|_cc| {
            Ok(Box::new(StudioApp::new(
                settings,
                settings_path,
                cmd_tx,
                ui_rx,
            )))
        }),
    )
}
