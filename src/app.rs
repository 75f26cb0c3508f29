use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RiskAtlasApp {
    pub state: AppState,
}

impl RiskAtlasApp {
    /// Build the app and start loading the configured dataset, if any.
    pub fn new(ctx: &egui::Context, config: &AppConfig) -> Self {
        let mut state = AppState::new(config);
        if let Some(path) = &config.dataset_path {
            state.start_load(ctx.clone(), path.clone());
        }
        Self { state }
    }
}

impl eframe::App for RiskAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom of central area: table ----
        egui::TopBottomPanel::bottom("table_panel")
            .resizable(true)
            .default_height(320.0)
            .show(ctx, |ui| {
                table::asset_table(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::risk_chart(ui, &self.state);
        });
    }
}
