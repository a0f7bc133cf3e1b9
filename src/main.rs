mod app;
mod color;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::SilentStruggleApp;
use eframe::egui;
use log::{error, info};
use silent_struggle::config::DashboardConfig;
use silent_struggle::data::load_file;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("loading dashboard configuration")?;

    // The table is loaded once and shared; nothing renders without it.
    let table = match load_file(&config.dataset_path) {
        Ok(table) => Arc::new(table),
        Err(err) => {
            error!("{err}");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("The Silent Struggle")
                .set_description(format!("Could not load the survey dataset.\n\n{err}"))
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            return Err(err).context("loading survey dataset");
        }
    };

    let state = AppState::new(table, &config);
    info!(
        "dashboard ready: {} charts failed",
        state.dashboard.failures()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "The Silent Struggle",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(color::visuals());
            Ok(Box::new(SilentStruggleApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
