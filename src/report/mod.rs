//! Presentation adapter: shapes parsed data into what renderers consume.
//!
//! - chart data (`chart_data`, `prediction_chart_data`)
//! - table preview (`table_preview`)
//! - summary stats (`file_summary`)
//!
//! Text formatting for terminal output lives in `format`.

pub mod format;

pub use format::*;

use crate::domain::{
    ChartData, FileSummary, ParsedSeries, PredictionSeries, SeriesSource, TablePreview, UploadedFile,
};

/// Split a parsed series into parallel label/value arrays.
pub fn chart_data(series: &ParsedSeries) -> ChartData {
    let (labels, values) = series
        .points()
        .iter()
        .map(|p| (p.label.clone(), p.value))
        .unzip();
    ChartData {
        source: SeriesSource::Local,
        labels,
        values,
    }
}

/// Chart data for a validated prediction.
pub fn prediction_chart_data(prediction: &PredictionSeries) -> ChartData {
    ChartData {
        source: SeriesSource::Prediction,
        labels: prediction.dates().to_vec(),
        values: prediction.predictions().to_vec(),
    }
}

/// Every column of every row, independent of the series cap.
///
/// Blank lines are skipped and trailing `\r` is dropped; fields are otherwise
/// kept verbatim.
pub fn table_preview(content: &str) -> TablePreview {
    let mut lines = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let Some(header) = lines.next() else {
        return TablePreview::default();
    };

    TablePreview {
        headers: split_fields(header),
        rows: lines.map(split_fields).collect(),
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

pub fn file_summary(file: &UploadedFile) -> FileSummary {
    FileSummary {
        name: file.name().to_string(),
        rows: file.row_count(),
        size: format_file_size(file.size()),
        format: "CSV",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_series;

    #[test]
    fn chart_arrays_are_parallel_and_ordered() {
        let series = parse_series("d,v\nmon,1\ntue,x\nwed,3\n");
        let chart = chart_data(&series);
        assert_eq!(chart.source, SeriesSource::Local);
        assert_eq!(chart.labels, vec!["mon", "wed"]);
        assert_eq!(chart.values, vec![1.0, 3.0]);
    }

    #[test]
    fn empty_series_gives_empty_chart() {
        let chart = chart_data(&parse_series("a,b"));
        assert!(chart.is_empty());
        assert!(chart.values.is_empty());
    }

    #[test]
    fn table_keeps_all_rows_and_columns() {
        let mut content = String::from("a,b,c\n");
        for i in 0..150 {
            content.push_str(&format!("{i},x,{}\n", i * 2));
        }
        content.push_str("short\n");

        let table = table_preview(&content);
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows.len(), 151);
        assert_eq!(table.rows[149], vec!["149", "x", "298"]);
        assert_eq!(table.rows[150], vec!["short"]);
    }

    #[test]
    fn table_of_empty_content_is_empty() {
        assert_eq!(table_preview(""), TablePreview::default());
        assert_eq!(table_preview("\r\n\r\n"), TablePreview::default());
    }

    #[test]
    fn table_strips_carriage_returns() {
        let table = table_preview("a,b\r\n1,2\r\n");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn summary_formats_size_and_rows() {
        let file = UploadedFile::new("sales.csv", 1536, "a,b\n1,2\n\n".to_string());
        let summary = file_summary(&file);
        assert_eq!(summary.name, "sales.csv");
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.size, "1.5 KB");
        assert_eq!(summary.format, "CSV");
    }
}
