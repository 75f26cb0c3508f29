use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::color::rating_color;
use crate::data::series::Series;
use crate::state::AppState;

const LINE_COLOR: Color32 = Color32::from_rgb(255, 99, 132);

// ---------------------------------------------------------------------------
// Risk rating chart (upper half of the central panel)
// ---------------------------------------------------------------------------

/// Render the rating-over-time chart for the current selector.
pub fn risk_chart(ui: &mut Ui, state: &AppState) {
    let series = match &state.series {
        Ok(series) => series,
        Err(e) => {
            ui.label(RichText::new(format!("Chart data error: {e}")).color(Color32::RED));
            return;
        }
    };

    if series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = if state.dataset.is_empty() {
                "Open a file to view risk data  (File → Open…)"
            } else if state.selector.criterion().is_none() {
                "Pick a location, asset or category to chart"
            } else {
                "Nothing to chart for this selection"
            };
            ui.label(hint);
        });
        return;
    }

    let labels = series.labels.clone();
    let tooltip_series = series.clone();
    let (min, max) = state.rating_range;

    Plot::new("risk_chart")
        .x_axis_label("Year")
        .y_axis_label("Risk Rating")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .x_axis_formatter(move |mark, _range| {
            point_index(mark.value, labels.len())
                .and_then(|i| labels.get(i).cloned())
                .unwrap_or_default()
        })
        .label_formatter(move |_name, value| {
            point_index(value.x, tooltip_series.len())
                .map(|i| tooltip_lines(&tooltip_series, i).join("\n"))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            let positions: Vec<[f64; 2]> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| [i as f64, v])
                .collect();

            plot_ui.line(
                Line::new(PlotPoints::from(positions.clone()))
                    .name("Risk Rating")
                    .color(LINE_COLOR)
                    .width(1.5),
            );
            for point in positions {
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![point]))
                        .radius(4.0)
                        .color(rating_color(point[1], min, max)),
                );
            }
        });
}

/// Series index a plot x-coordinate sits on, if it is close to one.
fn point_index(x: f64, len: usize) -> Option<usize> {
    let nearest = x.round();
    if (x - nearest).abs() > 0.25 || nearest < 0.0 || nearest >= len as f64 {
        return None;
    }
    Some(nearest as usize)
}

/// Tooltip text for point `i`: year, asset, rating and raw risk factors.
fn tooltip_lines(series: &Series, i: usize) -> Vec<String> {
    vec![
        format!("Year: {}", series.labels[i]),
        format!("Asset Name: {}", series.asset_names[i]),
        format!("Risk Rating: {}", series.values[i]),
        format!("Risk Factors: {}", series.risk_factors[i]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_positions_snap_to_points() {
        assert_eq!(point_index(0.0, 3), Some(0));
        assert_eq!(point_index(1.9, 3), Some(2));
        assert_eq!(point_index(1.5, 3), None);
        assert_eq!(point_index(3.0, 3), None);
        assert_eq!(point_index(-0.1, 3), Some(0));
        assert_eq!(point_index(-1.0, 3), None);
    }

    #[test]
    fn tooltip_carries_point_metadata() {
        let series = Series {
            labels: vec!["2020".into(), "2021".into()],
            values: vec![3.5, 4.0],
            asset_names: vec!["Asset A".into(), "Asset A".into()],
            risk_factors: vec![r#"{"flood":1}"#.into(), r#"{"flood":1,"fire":1}"#.into()],
        };
        assert_eq!(
            tooltip_lines(&series, 1),
            vec![
                "Year: 2021",
                "Asset Name: Asset A",
                "Risk Rating: 4",
                r#"Risk Factors: {"flood":1,"fire":1}"#,
            ]
        );
    }
}
