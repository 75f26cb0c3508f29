use std::path::PathBuf;

use crossbeam_channel::{Receiver, TryRecvError};
use eframe::egui;

use crate::color::CategoryColors;
use crate::config::AppConfig;
use crate::data::error::QueryError;
use crate::data::filter::{filtered_rows, ALL_YEARS};
use crate::data::loader::load_file;
use crate::data::model::{Dataset, Location};
use crate::data::series::{project_series, Selector, Series};
use crate::data::table::{project_table, Column, SortState, TableView};

type LoadResult = anyhow::Result<(PathBuf, Dataset)>;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Views are recomputed eagerly whenever one of their inputs changes and
/// cached until the next change; rendering only reads them.
pub struct AppState {
    /// Current dataset. Empty until the first load completes.
    pub dataset: Dataset,
    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Selected year or [`ALL_YEARS`].
    pub year: String,
    /// Exact risk-factor key to search for; empty means no search.
    pub tag_query: String,
    pub sort: SortState,
    pub selector: Selector,

    /// Choices offered by the side panel.
    pub year_choices: Vec<String>,
    pub tag_suggestions: Vec<String>,
    pub asset_names: Vec<String>,
    pub business_categories: Vec<String>,
    pub locations: Vec<Location>,

    /// Table for the current year, search and sort.
    pub table: Result<TableView, QueryError>,
    /// Chart series for the current selector.
    pub series: Result<Series, QueryError>,

    /// Smallest and largest parseable rating, for colouring.
    pub rating_range: (f64, f64),
    pub category_colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
    pending: Option<Receiver<LoadResult>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dataset: Dataset::default(),
            source: None,
            year: config.default_year.clone(),
            tag_query: String::new(),
            sort: SortState::default(),
            selector: Selector::default(),
            year_choices: Vec::new(),
            tag_suggestions: Vec::new(),
            asset_names: Vec::new(),
            business_categories: Vec::new(),
            locations: Vec::new(),
            table: Ok(TableView::default()),
            series: Ok(Series::default()),
            rating_range: (0.0, 0.0),
            category_colors: CategoryColors::default(),
            status_message: None,
            loading: false,
            pending: None,
        }
    }

    // -- Loading --

    /// Load `path` on a background thread; [`poll_load`](Self::poll_load)
    /// picks up the result.
    pub fn start_load(&mut self, ctx: egui::Context, path: PathBuf) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.pending = Some(rx);
        self.loading = true;
        self.status_message = None;

        std::thread::spawn(move || {
            let result = load_file(&path).map(|dataset| (path, dataset));
            if tx.send(result).is_err() {
                log::error!("Failed to send loaded dataset");
            }
            ctx.request_repaint();
        });
    }

    /// Install a finished load, if one has arrived.
    pub fn poll_load(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok((path, dataset))) => {
                self.pending = None;
                self.set_dataset(Some(path), dataset);
            }
            Ok(Err(e)) => {
                self.pending = None;
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                log::error!("Loader thread exited without a result");
                self.status_message = Some("Error: loading was interrupted".to_string());
                self.loading = false;
            }
        }
    }

    /// Replace the dataset wholesale and rebuild every derived view.
    ///
    /// Year, search, sort and chart selection are kept.
    pub fn set_dataset(&mut self, source: Option<PathBuf>, dataset: Dataset) {
        self.status_message = None;

        self.year_choices = match dataset.years() {
            Ok(years) => years,
            Err(e) => {
                log::warn!("Year list unavailable: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Vec::new()
            }
        };
        self.tag_suggestions = match dataset.tag_keys() {
            Ok(keys) => keys.into_iter().collect(),
            Err(e) => {
                log::warn!("Tag suggestions unavailable: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Vec::new()
            }
        };
        self.asset_names = dataset.asset_names();
        self.business_categories = dataset.business_categories();
        self.locations = dataset.locations();
        self.category_colors = CategoryColors::new(&self.business_categories);
        self.rating_range = rating_range(&dataset);

        if let Some(path) = &source {
            log::info!(
                "Loaded {} records ({} years) from {}",
                dataset.len(),
                self.year_choices.len(),
                path.display()
            );
        }

        self.dataset = dataset;
        self.source = source;
        self.loading = false;
        self.refresh();
    }

    // -- Inputs --

    pub fn set_year(&mut self, year: &str) {
        if self.year != year {
            self.year = year.to_string();
            self.refresh_table();
        }
    }

    pub fn set_tag_query(&mut self, query: &str) {
        if self.tag_query != query {
            self.tag_query = query.to_string();
            self.refresh_table();
        }
    }

    /// Header click. Coordinate columns do nothing.
    pub fn toggle_sort(&mut self, column: Column) {
        let sort = self.sort.toggled(column);
        if sort != self.sort {
            self.sort = sort;
            self.refresh_table();
        }
    }

    pub fn set_selector(&mut self, selector: Selector) {
        if self.selector != selector {
            self.selector = selector;
            self.refresh_series();
        }
    }

    // -- Derived views --

    /// Recompute the table and the series.
    pub fn refresh(&mut self) {
        self.refresh_table();
        self.refresh_series();
    }

    fn refresh_table(&mut self) {
        let query = Some(self.tag_query.as_str());
        self.table = filtered_rows(&self.dataset, Some(self.year.as_str()), query)
            .and_then(|rows| project_table(&self.dataset, &rows, self.sort));
        if let Err(e) = &self.table {
            log::warn!("Table unavailable: {e}");
        }
    }

    /// The chart spans every year of the selected entity, independent of
    /// the table's year and search filters.
    fn refresh_series(&mut self) {
        self.series = project_series(&self.dataset, &self.dataset.all_rows(), &self.selector);
        if let Err(e) = &self.series {
            log::warn!("Series unavailable: {e}");
        }
    }

    /// Year selector entries: the "All" sentinel first.
    pub fn year_options(&self) -> impl Iterator<Item = &str> {
        std::iter::once(ALL_YEARS).chain(self.year_choices.iter().map(String::as_str))
    }
}

fn rating_range(dataset: &Dataset) -> (f64, f64) {
    let ratings = dataset
        .records
        .iter()
        .enumerate()
        .filter_map(|(i, rec)| rec.rating(i).ok());
    let (min, max) = ratings.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{asset_a, record};
    use crate::data::table::SortDirection;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(None, asset_a());
        state
    }

    fn table_years(state: &AppState) -> Vec<String> {
        match &state.table {
            Ok(view) => view.rows.iter().map(|r| r.cell(Column::Year).to_string()).collect(),
            Err(e) => panic!("table error: {e}"),
        }
    }

    #[test]
    fn views_are_empty_before_any_dataset() {
        let state = AppState::default();
        assert!(matches!(&state.table, Ok(v) if v.is_empty()));
        assert!(matches!(&state.series, Ok(s) if s.is_empty()));
        assert_eq!(state.year_options().collect::<Vec<_>>(), vec![ALL_YEARS]);
    }

    #[test]
    fn new_dataset_fills_choices_and_views() {
        let state = loaded();
        assert_eq!(
            state.year_options().collect::<Vec<_>>(),
            vec![ALL_YEARS, "2020", "2021"]
        );
        assert_eq!(state.tag_suggestions, vec!["fire", "flood"]);
        assert_eq!(state.rating_range, (3.5, 4.0));
        assert_eq!(table_years(&state), vec!["2020", "2021"]);
    }

    #[test]
    fn inputs_recompute_the_table() {
        let mut state = loaded();
        state.set_year("2021");
        assert_eq!(table_years(&state), vec!["2021"]);

        state.set_year(ALL_YEARS);
        state.set_tag_query("fire");
        assert_eq!(table_years(&state), vec!["2021"]);

        state.set_tag_query("");
        state.toggle_sort(Column::Year);
        state.toggle_sort(Column::Year);
        assert_eq!(state.sort, SortState::by(Column::Year, SortDirection::Descending));
        assert_eq!(table_years(&state), vec!["2021", "2020"]);

        state.toggle_sort(Column::Longitude);
        assert_eq!(table_years(&state), vec!["2021", "2020"]);
    }

    #[test]
    fn selector_drives_the_series() {
        let mut state = loaded();
        state.set_year("2020");
        state.set_selector(Selector::asset_name("Asset A"));
        let series = state.series.as_ref().map(|s| s.labels.clone()).unwrap();
        assert_eq!(series, vec!["2020", "2021"]);
    }

    #[test]
    fn decode_fault_is_distinct_from_an_empty_table() {
        let mut state = loaded();
        state.set_tag_query("earthquake");
        assert!(matches!(&state.table, Ok(v) if v.is_empty()));

        let mut ds = asset_a();
        ds.records.push(record("Bad", "Cat1", "1", "not json", "2021", "0", "0"));
        state.set_dataset(None, ds);
        assert!(matches!(&state.table, Err(QueryError::Decode { row: 2, .. })));
        assert!(state.tag_suggestions.is_empty());
        let status = state.status_message.as_deref().unwrap_or_default();
        assert!(status.contains("row 2"), "status: {status}");

        // A clean reload clears the fault.
        state.set_dataset(None, asset_a());
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn reload_keeps_filter_inputs() {
        let mut state = loaded();
        state.set_year("2021");
        state.set_dataset(None, asset_a());
        assert_eq!(state.year, "2021");
        assert_eq!(table_years(&state), vec!["2021"]);
    }
}
