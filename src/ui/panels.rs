use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::series::{Criterion, Selector};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filters and chart selection
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_selector(ui, state);
            ui.add_space(6.0);
            tag_search(ui, state);
            ui.separator();
            chart_selector(ui, state);
        });
}

fn year_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Year");
    let mut chosen = None;
    egui::ComboBox::from_id_salt("year")
        .selected_text(state.year.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for year in state.year_options() {
                if ui.selectable_label(state.year == year, year).clicked() {
                    chosen = Some(year.to_string());
                }
            }
        });
    if let Some(year) = chosen {
        state.set_year(&year);
    }
}

fn tag_search(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Type Risk Factor");
    let mut query = state.tag_query.clone();
    ui.add(egui::TextEdit::singleline(&mut query).hint_text("Search by risk factor"));

    // Suggestions: known keys containing what has been typed so far.
    // Picking one still performs an exact-key search.
    if !query.is_empty() && !state.tag_suggestions.contains(&query) {
        let needle = query.to_lowercase();
        for tag in state
            .tag_suggestions
            .iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .take(8)
        {
            if ui.small_button(tag).clicked() {
                query = tag.clone();
            }
        }
    }
    state.set_tag_query(&query);
}

fn chart_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Chart");
    let current = match state.selector.criterion() {
        Some(Criterion::Location { lat, long }) => format!("Location {lat}, {long}"),
        Some(Criterion::AssetName(name)) => format!("Asset {name}"),
        Some(Criterion::BusinessCategory(cat)) => format!("Category {cat}"),
        None => "nothing selected".to_string(),
    };
    ui.label(current);

    let mut picked = None;
    egui::ComboBox::from_id_salt("chart_location")
        .selected_text("By location")
        .show_ui(ui, |ui: &mut Ui| {
            for loc in &state.locations {
                if ui.selectable_label(false, loc.to_string()).clicked() {
                    picked = Some(Selector::location(loc));
                }
            }
        });
    egui::ComboBox::from_id_salt("chart_asset")
        .selected_text("By asset name")
        .show_ui(ui, |ui: &mut Ui| {
            for name in &state.asset_names {
                if ui.selectable_label(false, name).clicked() {
                    picked = Some(Selector::asset_name(name.clone()));
                }
            }
        });
    egui::ComboBox::from_id_salt("chart_category")
        .selected_text("By business category")
        .show_ui(ui, |ui: &mut Ui| {
            for cat in &state.business_categories {
                let text = RichText::new(cat).color(state.category_colors.color_for(cat));
                if ui.selectable_label(false, text).clicked() {
                    picked = Some(Selector::business_category(cat.clone()));
                }
            }
        });
    if ui.small_button("Clear").clicked() {
        picked = Some(Selector::default());
    }

    if let Some(selector) = picked {
        state.set_selector(selector);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx().clone(), state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading…");
        } else if !state.dataset.is_empty() {
            let visible = state.table.as_ref().map(|t| t.len()).unwrap_or(0);
            ui.label(format!(
                "{} records loaded, {visible} shown",
                state.dataset.len()
            ));
            if let Some(path) = &state.source {
                ui.weak(path.display().to_string());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(ctx: egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open risk dataset")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.start_load(ctx, path);
    }
}
