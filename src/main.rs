mod app;
mod cli;
mod color;
mod data;
mod error;
mod state;
mod stats;
mod ui;

use anyhow::{Context, Result};
use app::DashboardApp;
use clap::Parser;
use eframe::egui;

use cli::Cli;
use data::loader;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // A dataset named on the command line must load before any window opens.
    let mut state = AppState::default();
    if let Some(path) = &cli.path {
        let dataset = loader::load_file_with(path, &cli.load_options())
            .with_context(|| format!("loading dataset {}", path.display()))?;
        log::info!("Loaded {} records from {}", dataset.len(), path.display());
        state.set_dataset(dataset, path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Student Performance Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
