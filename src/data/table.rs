use std::cmp::Ordering;
use std::fmt;

use super::error::QueryError;
use super::model::{AssetYearRecord, Dataset};

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// The seven displayed columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    AssetName,
    BusinessCategory,
    RiskRating,
    RiskFactors,
    Year,
    Latitude,
    Longitude,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::AssetName,
        Column::BusinessCategory,
        Column::RiskRating,
        Column::RiskFactors,
        Column::Year,
        Column::Latitude,
        Column::Longitude,
    ];

    /// Header text, also used as the column's key.
    pub fn header(self) -> &'static str {
        match self {
            Column::AssetName => "Asset Name",
            Column::BusinessCategory => "Business Category",
            Column::RiskRating => "Risk Rating",
            Column::RiskFactors => "Risk Factors",
            Column::Year => "Year",
            Column::Latitude => "Latitude",
            Column::Longitude => "Longitude",
        }
    }

    /// Look a column up by its header text.
    pub fn from_header(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == name)
    }

    /// Coordinates are display-only.
    pub fn is_sortable(self) -> bool {
        !matches!(self, Column::Latitude | Column::Longitude)
    }

    fn position(self) -> usize {
        self as usize
    }

    /// Raw cell text for a record.
    pub fn text(self, rec: &AssetYearRecord) -> &str {
        match self {
            Column::AssetName => &rec.asset_name,
            Column::BusinessCategory => &rec.business_category,
            Column::RiskRating => &rec.risk_rating,
            Column::RiskFactors => &rec.risk_factors,
            Column::Year => &rec.year,
            Column::Latitude => &rec.lat,
            Column::Longitude => &rec.long,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// Sort state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort: a column and direction, or `None` for natural order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState(pub Option<(Column, SortDirection)>);

impl SortState {
    pub fn by(column: Column, direction: SortDirection) -> Self {
        SortState(Some((column, direction)))
    }

    /// Header-click cycle: unsorted → ascending → descending → unsorted.
    ///
    /// Clicking a different column starts it at ascending. Clicking a
    /// coordinate column leaves the state as it was.
    pub fn toggled(self, column: Column) -> Self {
        if !column.is_sortable() {
            return self;
        }
        match self.0 {
            Some((c, SortDirection::Ascending)) if c == column => {
                SortState::by(column, SortDirection::Descending)
            }
            Some((c, SortDirection::Descending)) if c == column => SortState(None),
            _ => SortState::by(column, SortDirection::Ascending),
        }
    }

    /// Direction `column` is currently sorted in, if any.
    pub fn direction_of(self, column: Column) -> Option<SortDirection> {
        match self.0 {
            Some((c, dir)) if c == column => Some(dir),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// One header cell: which column and whether it drives the current order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: Column,
    pub sortable: bool,
    pub sorted: Option<SortDirection>,
}

/// One display row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Index of the record in the dataset.
    pub source_row: usize,
    pub cells: [String; 7],
}

impl TableRow {
    pub fn cell(&self, column: Column) -> &str {
        &self.cells[column.position()]
    }
}

/// A complete, ordered table payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<TableRow>,
}

impl TableView {
    /// Cell text addressed by header name and display row index.
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let column = Column::from_header(header)?;
        self.rows.get(row).map(|r| r.cell(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Stable sort of `rows` by a per-row key of a single type.
fn keyed_order<K>(
    rows: &[usize],
    direction: SortDirection,
    key: impl Fn(usize) -> Result<K, QueryError>,
    cmp: impl Fn(&K, &K) -> Ordering,
) -> Result<Vec<usize>, QueryError> {
    let mut keyed = rows
        .iter()
        .map(|&i| Ok((key(i)?, i)))
        .collect::<Result<Vec<_>, QueryError>>()?;
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => cmp(a, b),
        SortDirection::Descending => cmp(b, a),
    });
    Ok(keyed.into_iter().map(|(_, i)| i).collect())
}

/// Project `rows` into display rows, ordered by `sort`.
///
/// The sort is stable: rows with equal keys keep their incoming order in
/// both directions. Numeric columns that fail to parse yield
/// [`QueryError::Parse`]. A sort on a coordinate column is dropped, and the
/// headers then report no sorted column.
pub fn project_table(
    dataset: &Dataset,
    rows: &[usize],
    sort: SortState,
) -> Result<TableView, QueryError> {
    let sort = SortState(sort.0.filter(|(c, _)| c.is_sortable()));
    let records = &dataset.records;

    let order = match sort.0 {
        None => rows.to_vec(),
        Some((Column::RiskRating, direction)) => {
            keyed_order(rows, direction, |i| records[i].rating(i), f64::total_cmp)?
        }
        Some((Column::Year, direction)) => {
            keyed_order(rows, direction, |i| records[i].year_number(i), i64::cmp)?
        }
        Some((column, direction)) => keyed_order(
            rows,
            direction,
            |i| Ok(column.text(&records[i])),
            |a: &&str, b: &&str| a.cmp(b),
        )?,
    };

    let headers = Column::ALL
        .into_iter()
        .map(|column| HeaderCell {
            column,
            sortable: column.is_sortable(),
            sorted: sort.direction_of(column),
        })
        .collect();

    let rows = order
        .into_iter()
        .map(|i| {
            let rec = &dataset.records[i];
            TableRow {
                source_row: i,
                cells: Column::ALL.map(|c| c.text(rec).to_string()),
            }
        })
        .collect();

    Ok(TableView { headers, rows })
}
