use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{AssetYearRecord, Dataset};

/// Source column names, shared by the CSV header and JSON object keys.
pub const COLUMNS: [&str; 7] = [
    "Asset Name",
    "Business Category",
    "Risk Rating",
    "Risk Factors",
    "Year",
    "Lat",
    "Long",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a risk dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row naming the seven columns in [`COLUMNS`]
/// * `.json` – `[{ "Asset Name": "...", "Risk Factors": "{...}", ... }, ...]`
///
/// Only the shape of each record is checked here. Numbers and the embedded
/// risk-factor JSON stay as text for the query layer to interpret.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text with a header row. Extra columns are ignored.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for col in COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<AssetYearRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        check_record(&record, row_no)?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as exported from the sheet):
///
/// ```json
/// [
///   {
///     "Asset Name": "Harbour Crane 3",
///     "Business Category": "Logistics",
///     "Risk Rating": "4.2",
///     "Risk Factors": "{\"Flooding\": 0.7}",
///     "Year": "2030",
///     "Lat": "51.5",
///     "Long": "-0.12"
///   }
/// ]
/// ```
///
/// Numbers are accepted in place of numeric strings, and an inline object in
/// place of the encoded `Risk Factors` string; both are turned back into text.
pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let field = |name: &str| -> Result<String> {
            match obj.get(name) {
                Some(JsonValue::String(s)) => Ok(s.clone()),
                Some(v @ (JsonValue::Number(_) | JsonValue::Object(_))) => Ok(v.to_string()),
                Some(other) => bail!("Row {i}: '{name}' has unexpected value {other}"),
                None => bail!("Row {i}: missing '{name}'"),
            }
        };

        let record = AssetYearRecord {
            asset_name: field("Asset Name")?,
            business_category: field("Business Category")?,
            risk_rating: field("Risk Rating")?,
            risk_factors: field("Risk Factors")?,
            year: field("Year")?,
            lat: field("Lat")?,
            long: field("Long")?,
        };
        check_record(&record, i)?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}

fn check_record(record: &AssetYearRecord, row: usize) -> Result<()> {
    if record.asset_name.trim().is_empty() {
        bail!("Row {row}: empty 'Asset Name'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Asset Name,Business Category,Risk Rating,Risk Factors,Year,Lat,Long
Asset A,Cat1,3.5,\"{\"\"flood\"\":1}\",2020,10.0,20.0
Asset A,Cat1,4.0,\"{\"\"flood\"\":1,\"\"fire\"\":1}\",2021,10.0,20.0
";

    #[test]
    fn csv_rows_keep_their_text() -> Result<()> {
        let ds = parse_csv(CSV.as_bytes())?;
        assert_eq!(ds.len(), 2);
        let rec = &ds.records[1];
        assert_eq!(rec.asset_name, "Asset A");
        assert_eq!(rec.risk_rating, "4.0");
        assert_eq!(rec.risk_factors, r#"{"flood":1,"fire":1}"#);
        assert_eq!(rec.year, "2021");
        assert_eq!((rec.lat.as_str(), rec.long.as_str()), ("10.0", "20.0"));
        Ok(())
    }

    #[test]
    fn csv_header_order_and_extra_columns_do_not_matter() -> Result<()> {
        let text = "Year,Lat,Long,Notes,Asset Name,Business Category,Risk Rating,Risk Factors\n\
                    2019,1,2,n/a,Dam,Energy,2.5,{}\n";
        let ds = parse_csv(text.as_bytes())?;
        assert_eq!(ds.records[0].asset_name, "Dam");
        assert_eq!(ds.records[0].year, "2019");
        Ok(())
    }

    #[test]
    fn csv_missing_column_is_rejected() {
        let text = "Asset Name,Business Category,Risk Rating,Year,Lat,Long\nA,B,1,2020,0,0\n";
        let err = parse_csv(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Risk Factors"));
    }

    #[test]
    fn malformed_risk_factors_are_loaded_untouched() -> Result<()> {
        let text = "Asset Name,Business Category,Risk Rating,Risk Factors,Year,Lat,Long\n\
                    A,B,1,not json,2020,0,0\n";
        let ds = parse_csv(text.as_bytes())?;
        assert_eq!(ds.records[0].risk_factors, "not json");
        Ok(())
    }

    #[test]
    fn json_accepts_strings_numbers_and_inline_objects() -> Result<()> {
        let text = r#"[
            {"Asset Name": "Pier", "Business Category": "Logistics", "Risk Rating": 4.5,
             "Risk Factors": {"storm": 1}, "Year": 2030, "Lat": "51.5", "Long": -0.12},
            {"Asset Name": "Depot", "Business Category": "Logistics", "Risk Rating": "2",
             "Risk Factors": "{\"fire\": 0}", "Year": "2031", "Lat": "1", "Long": "2"}
        ]"#;
        let ds = parse_json(text)?;
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].risk_rating, "4.5");
        assert_eq!(ds.records[0].year, "2030");
        assert_eq!(ds.records[0].long, "-0.12");
        assert!(ds.records[0].has_risk_factor(0, "storm")?);
        assert_eq!(ds.records[1].risk_factors, r#"{"fire": 0}"#);
        Ok(())
    }

    #[test]
    fn json_shape_errors_name_the_row() {
        let err = parse_json(r#"[{"Asset Name": "X"}]"#).unwrap_err();
        assert!(err.to_string().contains("Row 0"));

        let err = parse_json(r#"{"Asset Name": "X"}"#).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn empty_asset_name_is_rejected() {
        let text = "Asset Name,Business Category,Risk Rating,Risk Factors,Year,Lat,Long\n\
                    ,B,1,{},2020,0,0\n";
        assert!(parse_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("data.parquet")).unwrap_err();
        assert!(err.to_string().contains(".parquet"));
    }
}
