//! Export the charted series to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{ChartData, SeriesFormat, SeriesSource};
use crate::error::AppError;

#[derive(Serialize)]
struct SeriesRecord<'a> {
    label: &'a str,
    value: f64,
}

#[derive(Serialize)]
struct SeriesDocument<'a> {
    source: SeriesSource,
    labels: &'a [String],
    values: &'a [f64],
}

/// Write chart data to `writer` in the requested format.
pub fn write_series<W: Write>(writer: W, chart: &ChartData, format: SeriesFormat) -> Result<(), AppError> {
    match format {
        SeriesFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for (label, value) in chart.labels.iter().zip(chart.values.iter()) {
                wtr.serialize(SeriesRecord { label, value: *value })
                    .map_err(|e| AppError::new(2, format!("Failed to write series row: {e}")))?;
            }
            // An empty series still gets a header row.
            if chart.is_empty() {
                wtr.write_record(["label", "value"])
                    .map_err(|e| AppError::new(2, format!("Failed to write series header: {e}")))?;
            }
            wtr.flush()
                .map_err(|e| AppError::new(2, format!("Failed to flush series output: {e}")))?;
        }
        SeriesFormat::Json => {
            let doc = SeriesDocument {
                source: chart.source,
                labels: &chart.labels,
                values: &chart.values,
            };
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &doc)
                .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;
            writeln!(writer).map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;
        }
    }
    Ok(())
}

/// Write chart data to a file; `.json` selects JSON, anything else CSV.
pub fn export_series(path: &Path, chart: &ChartData) -> Result<(), AppError> {
    let format = format_for_path(path);
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export '{}': {e}", path.display())))?;
    write_series(file, chart, format)?;
    tracing::info!(path = %path.display(), points = chart.len(), "series exported");
    Ok(())
}

fn format_for_path(path: &Path) -> SeriesFormat {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        == Some(true);
    if is_json { SeriesFormat::Json } else { SeriesFormat::Csv }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> ChartData {
        ChartData {
            source: SeriesSource::Prediction,
            labels: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            values: vec![1.5, 2.0],
        }
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let mut buf = Vec::new();
        write_series(&mut buf, &chart(), SeriesFormat::Csv).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        assert_eq!(txt, "label,value\n2024-01-01,1.5\n2024-01-02,2.0\n");
    }

    #[test]
    fn csv_output_for_empty_series_is_header_only() {
        let mut buf = Vec::new();
        write_series(&mut buf, &ChartData::empty(SeriesSource::Local), SeriesFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "label,value\n");
    }

    #[test]
    fn json_output_round_trips_through_serde() {
        let mut buf = Vec::new();
        write_series(&mut buf, &chart(), SeriesFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["source"], "prediction");
        assert_eq!(v["labels"][1], "2024-01-02");
        assert_eq!(v["values"][0], 1.5);
    }

    #[test]
    fn export_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("out.JSON");
        export_series(&json_path, &chart()).unwrap();
        let txt = std::fs::read_to_string(&json_path).unwrap();
        assert!(txt.trim_start().starts_with('{'));

        let csv_path = dir.path().join("out.txt");
        export_series(&csv_path, &chart()).unwrap();
        let txt = std::fs::read_to_string(&csv_path).unwrap();
        assert!(txt.starts_with("label,value\n"));
    }
}
