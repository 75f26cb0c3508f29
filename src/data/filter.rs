use super::error::QueryError;
use super::model::Dataset;

/// Year selector value meaning "do not filter by year".
pub const ALL_YEARS: &str = "All";

// ---------------------------------------------------------------------------
// Filters over row indices
// ---------------------------------------------------------------------------
//
// Every filter takes the rows that survived the previous stage and returns a
// fresh, order-preserving subset. Inputs are never mutated.

/// Keep rows whose `Year` text equals `year`.
///
/// `None` and [`ALL_YEARS`] return `rows` unchanged.
pub fn filter_by_year(dataset: &Dataset, rows: &[usize], year: Option<&str>) -> Vec<usize> {
    match year {
        None | Some(ALL_YEARS) => rows.to_vec(),
        Some(year) => rows
            .iter()
            .copied()
            .filter(|&i| dataset.records[i].year == year)
            .collect(),
    }
}

/// Keep rows whose decoded risk factors contain `query` as an exact key.
///
/// `None` and the empty string return `rows` unchanged. A record whose risk
/// factors cannot be decoded aborts the filter: it is a fault, not a miss.
pub fn filter_by_tag(
    dataset: &Dataset,
    rows: &[usize],
    query: Option<&str>,
) -> Result<Vec<usize>, QueryError> {
    let query = match query {
        None | Some("") => return Ok(rows.to_vec()),
        Some(q) => q,
    };

    let mut kept = Vec::new();
    for &i in rows {
        if dataset.records[i].has_risk_factor(i, query)? {
            kept.push(i);
        }
    }
    Ok(kept)
}

/// Year filter, then tag filter, over the whole dataset.
pub fn filtered_rows(
    dataset: &Dataset,
    year: Option<&str>,
    tag_query: Option<&str>,
) -> Result<Vec<usize>, QueryError> {
    let by_year = filter_by_year(dataset, &dataset.all_rows(), year);
    let rows = filter_by_tag(dataset, &by_year, tag_query)?;
    log::debug!(
        "filter year={year:?} tag={tag_query:?}: {} → {} → {} rows",
        dataset.len(),
        by_year.len(),
        rows.len()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{asset_a, record};

    fn mixed() -> Dataset {
        Dataset::new(vec![
            record("Dam", "Energy", "2.0", r#"{"flood":1}"#, "2020", "1", "1"),
            record("Mill", "Industry", "5.5", r#"{"fire":0.2,"drought":1}"#, "2021", "2", "2"),
            record("Port", "Logistics", "3.1", r#"{"storm":1,"flood":0}"#, "2021", "3", "3"),
            record("Mine", "Industry", "4.4", r#"{"firearms":1}"#, "2020", "4", "4"),
            record("Farm", "Agri", "1.0", r#"{"note":"fire"}"#, "2022", "5", "5"),
        ])
    }

    #[test]
    fn year_filter_keeps_exact_matches_in_order() {
        let ds = mixed();
        let rows = filter_by_year(&ds, &ds.all_rows(), Some("2021"));
        assert_eq!(rows, vec![1, 2]);
        for &i in &rows {
            assert_eq!(ds.records[i].year, "2021");
        }
    }

    #[test]
    fn year_filter_all_and_none_are_identity() {
        let ds = mixed();
        let all = ds.all_rows();
        assert_eq!(filter_by_year(&ds, &all, Some(ALL_YEARS)), all);
        assert_eq!(filter_by_year(&ds, &all, None), all);
    }

    #[test]
    fn year_filter_compares_text_not_numbers() {
        let ds = Dataset::new(vec![record("A", "C", "1", "{}", "2020", "0", "0")]);
        assert!(filter_by_year(&ds, &ds.all_rows(), Some("02020")).is_empty());
    }

    #[test]
    fn unknown_year_is_an_empty_result() {
        let ds = asset_a();
        assert!(filter_by_year(&ds, &ds.all_rows(), Some("2099")).is_empty());
    }

    #[test]
    fn tag_filter_matches_exact_keys_only() -> anyhow::Result<()> {
        let ds = mixed();
        // "fire" is a key of Mill, a key prefix of Mine and a value of Farm.
        assert_eq!(filter_by_tag(&ds, &ds.all_rows(), Some("fire"))?, vec![1]);
        assert_eq!(filter_by_tag(&ds, &ds.all_rows(), Some("flood"))?, vec![0, 2]);
        assert!(filter_by_tag(&ds, &ds.all_rows(), Some("Flood"))?.is_empty());
        Ok(())
    }

    #[test]
    fn empty_tag_query_is_identity() -> anyhow::Result<()> {
        let ds = mixed();
        assert_eq!(filter_by_tag(&ds, &ds.all_rows(), Some(""))?, ds.all_rows());
        assert_eq!(filter_by_tag(&ds, &ds.all_rows(), None)?, ds.all_rows());
        Ok(())
    }

    #[test]
    fn worked_example_fire_keeps_2021() -> anyhow::Result<()> {
        let ds = asset_a();
        let rows = filter_by_tag(&ds, &ds.all_rows(), Some("fire"))?;
        assert_eq!(rows, vec![1]);
        assert_eq!(ds.records[rows[0]].year, "2021");
        Ok(())
    }

    #[test]
    fn malformed_risk_factors_surface_a_decode_error() {
        let mut ds = asset_a();
        ds.records.push(record("Bad", "Cat1", "1.0", "not json", "2021", "0", "0"));
        let err = filter_by_tag(&ds, &ds.all_rows(), Some("flood")).unwrap_err();
        assert!(matches!(err, QueryError::Decode { row: 2, .. }));
    }

    #[test]
    fn malformed_rows_outside_the_input_are_not_decoded() -> anyhow::Result<()> {
        let mut ds = asset_a();
        ds.records.push(record("Bad", "Cat1", "1.0", "not json", "2019", "0", "0"));
        let rows = filtered_rows(&ds, Some("2021"), Some("fire"))?;
        assert_eq!(rows, vec![1]);
        Ok(())
    }

    #[test]
    fn filters_compose_like_restriction() -> anyhow::Result<()> {
        let ds = mixed();
        for year in ["2020", "2021", "2022", "2099"] {
            for tag in ["flood", "fire", "storm", "drought", ""] {
                let composed = filtered_rows(&ds, Some(year), Some(tag))?;
                let restricted: Vec<usize> = filter_by_tag(&ds, &ds.all_rows(), Some(tag))?
                    .into_iter()
                    .filter(|&i| ds.records[i].year == year)
                    .collect();
                assert_eq!(composed, restricted, "year={year} tag={tag}");
            }
        }
        Ok(())
    }

    #[test]
    fn filters_do_not_touch_the_input() -> anyhow::Result<()> {
        let ds = mixed();
        let before = ds.records.clone();
        let rows = ds.all_rows();
        let _ = filter_by_tag(&ds, &filter_by_year(&ds, &rows, Some("2021")), Some("storm"))?;
        assert_eq!(ds.records, before);
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
        Ok(())
    }
}
