use thiserror::Error;

// ---------------------------------------------------------------------------
// QueryError – data-quality faults found while filtering or projecting
// ---------------------------------------------------------------------------

/// Fault raised by the query layer when a record's text fields cannot be
/// interpreted where a filter, sort or series needs them.
///
/// An empty result is never an error: filters and projections return an
/// empty collection in that case.
#[derive(Debug, Error)]
pub enum QueryError {
    /// `Risk Factors` is not the text of a JSON object.
    #[error("row {row} ({asset}): risk factors are not a JSON object: {reason}")]
    Decode {
        row: usize,
        asset: String,
        reason: String,
    },

    /// A numeric field could not be parsed.
    #[error("row {row}: {field} '{value}' is not a valid number")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
    },
}
