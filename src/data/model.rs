use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::QueryError;

// ---------------------------------------------------------------------------
// AssetYearRecord – one row of the source sheet
// ---------------------------------------------------------------------------

/// One asset observed in one reporting year.
///
/// Every field is kept as the text the loader read. Numeric fields and the
/// JSON-encoded risk factors are interpreted lazily, where a filter or a
/// projection needs them, so that bad cells surface as [`QueryError`]s at the
/// point of use instead of being coerced at load time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetYearRecord {
    #[serde(rename = "Asset Name")]
    pub asset_name: String,
    #[serde(rename = "Business Category")]
    pub business_category: String,
    #[serde(rename = "Risk Rating")]
    pub risk_rating: String,
    /// JSON object text, e.g. `{"Flooding": 0.4, "Wildfire": 0.1}`.
    #[serde(rename = "Risk Factors")]
    pub risk_factors: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Lat")]
    pub lat: String,
    #[serde(rename = "Long")]
    pub long: String,
}

impl AssetYearRecord {
    /// Decode `Risk Factors` into its key → value mapping.
    ///
    /// `row` is only used to label the error.
    pub fn decode_risk_factors(&self, row: usize) -> Result<Map<String, JsonValue>, QueryError> {
        let decode_error = |reason: String| QueryError::Decode {
            row,
            asset: self.asset_name.clone(),
            reason,
        };
        match serde_json::from_str::<JsonValue>(&self.risk_factors) {
            Ok(JsonValue::Object(map)) => Ok(map),
            Ok(other) => Err(decode_error(format!("found {}", json_kind(&other)))),
            Err(e) => Err(decode_error(e.to_string())),
        }
    }

    /// Whether `key` is exactly one of the decoded risk-factor keys.
    pub fn has_risk_factor(&self, row: usize, key: &str) -> Result<bool, QueryError> {
        Ok(self.decode_risk_factors(row)?.contains_key(key))
    }

    /// `Risk Rating` as a finite float.
    pub fn rating(&self, row: usize) -> Result<f64, QueryError> {
        parse_finite(&self.risk_rating, row, "risk rating")
    }

    /// `Year` as an integer.
    pub fn year_number(&self, row: usize) -> Result<i64, QueryError> {
        self.year.trim().parse::<i64>().map_err(|_| QueryError::Parse {
            row,
            field: "year",
            value: self.year.clone(),
        })
    }

    /// The location key shared by all years of the same physical asset.
    pub fn location(&self) -> Location {
        Location {
            lat: self.lat.clone(),
            long: self.long.clone(),
        }
    }
}

fn parse_finite(text: &str, row: usize, field: &'static str) -> Result<f64, QueryError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| QueryError::Parse {
            row,
            field,
            value: text.to_string(),
        })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Location – composite (lat, long) key
// ---------------------------------------------------------------------------

/// Exact `(Lat, Long)` text pair. Compared as text, never as floats.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub lat: String,
    pub long: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.long)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded collection
// ---------------------------------------------------------------------------

/// The full loaded dataset. Read-only once built; a reload replaces it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<AssetYearRecord>,
}

impl Dataset {
    pub fn new(records: Vec<AssetYearRecord>) -> Self {
        Dataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every row index in natural order; the input to the first filter.
    pub fn all_rows(&self) -> Vec<usize> {
        (0..self.records.len()).collect()
    }

    /// Distinct `Year` texts in ascending numeric order.
    pub fn years(&self) -> Result<Vec<String>, QueryError> {
        let mut years = BTreeSet::new();
        for (row, rec) in self.records.iter().enumerate() {
            years.insert((rec.year_number(row)?, rec.year.clone()));
        }
        Ok(years.into_iter().map(|(_, text)| text).collect())
    }

    /// Distinct asset names, sorted.
    pub fn asset_names(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.asset_name.as_str()))
    }

    /// Distinct business categories, sorted.
    pub fn business_categories(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.business_category.as_str()))
    }

    /// Distinct locations, sorted by text.
    pub fn locations(&self) -> Vec<Location> {
        self.records
            .iter()
            .map(AssetYearRecord::location)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Union of every record's risk-factor keys.
    pub fn tag_keys(&self) -> Result<BTreeSet<String>, QueryError> {
        let mut keys = BTreeSet::new();
        for (row, rec) in self.records.iter().enumerate() {
            keys.extend(rec.decode_risk_factors(row)?.into_iter().map(|(k, _)| k));
        }
        Ok(keys)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
