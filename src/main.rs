#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod board;
mod config;
mod error;
mod logging;
mod sunset;
mod timeline;
mod ui;

use eframe::egui;

use config::Config;

fn main() -> eframe::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {e:#}");
            Config::default()
        }
    };

    // Held for the life of the process so buffered log lines are flushed
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };
    tracing::info!(api = %config.base_url(), log = %logging::log_file_path().display(), "Starting duskboard");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 900.0])
        .with_min_inner_size([900.0, 700.0])
        .with_title("Duskboard");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Duskboard",
        options,
        Box::new(|cc| Ok(Box::new(ui::DuskboardApp::new(cc, config)?))),
    )
}
