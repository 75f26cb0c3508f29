use super::error::QueryError;
use super::model::{AssetYearRecord, Dataset, Location};

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Which entity's history to chart.
///
/// Fields are checked in precedence order: a complete location, then asset
/// name, then business category. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub lat: Option<String>,
    pub long: Option<String>,
    pub asset_name: Option<String>,
    pub business_category: Option<String>,
}

/// The single criterion a [`Selector`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion<'a> {
    Location { lat: &'a str, long: &'a str },
    AssetName(&'a str),
    BusinessCategory(&'a str),
}

impl Criterion<'_> {
    fn matches(&self, rec: &AssetYearRecord) -> bool {
        match *self {
            Criterion::Location { lat, long } => rec.lat == lat && rec.long == long,
            Criterion::AssetName(name) => rec.asset_name == name,
            Criterion::BusinessCategory(cat) => rec.business_category == cat,
        }
    }
}

fn set(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl Selector {
    pub fn location(location: &Location) -> Self {
        Selector {
            lat: Some(location.lat.clone()),
            long: Some(location.long.clone()),
            ..Default::default()
        }
    }

    pub fn asset_name(name: impl Into<String>) -> Self {
        Selector {
            asset_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn business_category(category: impl Into<String>) -> Self {
        Selector {
            business_category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Apply the precedence rule. `None` means nothing is selected.
    pub fn criterion(&self) -> Option<Criterion<'_>> {
        if let (Some(lat), Some(long)) = (set(&self.lat), set(&self.long)) {
            return Some(Criterion::Location { lat, long });
        }
        if let Some(name) = set(&self.asset_name) {
            return Some(Criterion::AssetName(name));
        }
        set(&self.business_category).map(Criterion::BusinessCategory)
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// A chronological rating series with per-point tooltip metadata.
///
/// All four vectors always have the same length; index `i` across them
/// describes one point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    /// Year texts, ascending by numeric value.
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub asset_names: Vec<String>,
    /// Raw `Risk Factors` text.
    pub risk_factors: Vec<String>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Extract the series for `selector` from `rows`.
///
/// Points are ordered by the integer year; records from the same year keep
/// their incoming order. No match (or an empty selector) gives an empty
/// series. A year or rating that does not parse is a [`QueryError::Parse`].
pub fn project_series(
    dataset: &Dataset,
    rows: &[usize],
    selector: &Selector,
) -> Result<Series, QueryError> {
    let Some(criterion) = selector.criterion() else {
        return Ok(Series::default());
    };

    let mut points = Vec::new();
    for &i in rows {
        let rec = &dataset.records[i];
        if criterion.matches(rec) {
            points.push((rec.year_number(i)?, rec.rating(i)?, rec));
        }
    }
    points.sort_by_key(|&(year, _, _)| year);

    let mut series = Series::default();
    for (_, value, rec) in points {
        series.labels.push(rec.year.clone());
        series.values.push(value);
        series.asset_names.push(rec.asset_name.clone());
        series.risk_factors.push(rec.risk_factors.clone());
    }

    log::debug!("series for {criterion:?}: {} points", series.len());
    Ok(series)
}
