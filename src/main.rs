mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::RiskAtlasApp;
use config::{AppConfig, CONFIG_ENV};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::resolve(
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        std::env::args_os().nth(1).map(PathBuf::from),
    )?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Risk Atlas – Asset Risk Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(RiskAtlasApp::new(&cc.egui_ctx, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
