mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod export;
mod format;
mod state;
mod ui;

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use app::InventoryDashboardApp;
use config::DashboardConfig;
use data::cache::TableCache;
use eframe::egui;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = DashboardConfig::from_env();

    // No window is opened unless the base table loads.
    let mut cache = TableCache::new();
    let table = cache
        .load(&config.source_path)
        .with_context(|| format!("loading {}", config.source_path.display()))?;
    let state = AppState::new(cache, config.source_path.clone(), table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Inventory Optimization Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(InventoryDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI event loop failed: {e}"))
}
