use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::color::rating_color;
use crate::data::model::Location;
use crate::data::series::Selector;
use crate::data::table::{Column, SortDirection, TableView};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

/// What a click in the table asks for; applied after rendering.
enum TableAction {
    Sort(Column),
    Chart(Location),
}

// ---------------------------------------------------------------------------
// Asset table (lower half of the central panel)
// ---------------------------------------------------------------------------

pub fn asset_table(ui: &mut Ui, state: &mut AppState) {
    let view = match &state.table {
        Ok(view) => view,
        Err(e) => {
            ui.label(RichText::new(format!("Data error: {e}")).color(Color32::RED));
            return;
        }
    };

    if view.is_empty() && !state.dataset.is_empty() {
        ui.label("No records match the current filters.");
    }

    let action = render(ui, view, state.rating_range);
    match action {
        Some(TableAction::Sort(column)) => state.toggle_sort(column),
        Some(TableAction::Chart(location)) => state.set_selector(Selector::location(&location)),
        None => {}
    }
}

fn render(ui: &mut Ui, view: &TableView, (min, max): (f64, f64)) -> Option<TableAction> {
    let mut action = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(TableColumn::initial(160.0).at_least(80.0)) // Asset Name
        .column(TableColumn::initial(140.0).at_least(80.0)) // Business Category
        .column(TableColumn::auto().at_least(80.0)) // Risk Rating
        .column(TableColumn::initial(260.0).at_least(120.0).clip(true)) // Risk Factors
        .column(TableColumn::auto().at_least(50.0)) // Year
        .column(TableColumn::auto().at_least(70.0)) // Latitude
        .column(TableColumn::remainder().at_least(70.0)) // Longitude
        .min_scrolled_height(0.0)
        .header(24.0, |mut header| {
            for cell in &view.headers {
                header.col(|ui| {
                    let arrow = match cell.sorted {
                        Some(SortDirection::Ascending) => " 🔼",
                        Some(SortDirection::Descending) => " 🔽",
                        None => "",
                    };
                    let text = RichText::new(format!("{}{arrow}", cell.column)).strong();
                    if !cell.sortable {
                        ui.label(text);
                    } else if ui
                        .add(egui::Button::new(text).frame(false))
                        .on_hover_text("Sort")
                        .clicked()
                    {
                        action = Some(TableAction::Sort(cell.column));
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.rows.len(), |mut row| {
                let Some(data) = view.rows.get(row.index()) else {
                    return;
                };
                for column in Column::ALL {
                    let text = data.cell(column);
                    row.col(|ui| match column {
                        Column::AssetName => {
                            if ui.link(text).on_hover_text("Chart this location").clicked() {
                                action = Some(TableAction::Chart(Location {
                                    lat: data.cell(Column::Latitude).to_string(),
                                    long: data.cell(Column::Longitude).to_string(),
                                }));
                            }
                        }
                        Column::RiskRating => match text.trim().parse::<f64>() {
                            Ok(v) => {
                                ui.label(RichText::new(text).color(rating_color(v, min, max)));
                            }
                            Err(_) => {
                                ui.label(RichText::new(text).color(Color32::RED));
                            }
                        },
                        _ => {
                            ui.label(text);
                        }
                    });
                }
            });
        });

    action
}
