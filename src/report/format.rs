//! Formatted terminal output: file sizes, run summary, table preview.
//!
//! We keep formatting code in one place so:
//! - the parsing/ingest code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{ChartData, FileSummary, TablePreview};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Widest a table cell is allowed to render before truncation.
const MAX_CELL_WIDTH: usize = 24;

/// Human-readable size in binary units, rounded to two decimals.
///
/// `0` → `"0 Bytes"`, `1024` → `"1 KB"`, `1536` → `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // floor(log1024(bytes)), computed on integers to avoid float drift at
    // exact powers of 1024. Anything beyond GB stays in GB.
    let mut unit = 0usize;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    format!("{} {}", trim_decimal(&format!("{value:.2}")), SIZE_UNITS[unit])
}

/// Drop trailing zeros (and a dangling point) from a fixed-point string.
fn trim_decimal(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

/// Format the run summary: file stats, which series is charted, any notice.
pub fn format_run_summary(summary: &FileSummary, chart: &ChartData, notice: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str("=== csvp - CSV preview ===\n");
    out.push_str(&format!("File: {}\n", summary.name));
    out.push_str(&format!(
        "Rows: {} | Size: {} | Format: {}\n",
        summary.rows, summary.size, summary.format
    ));
    out.push_str(&format!(
        "Chart: {} ({} points)\n",
        chart.source.display_name(),
        chart.len()
    ));
    if let Some(notice) = notice {
        out.push_str(&format!("Notice: {notice}\n"));
    }

    out
}

/// Render the table preview as aligned text columns.
pub fn format_table(table: &TablePreview) -> String {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return "(empty file)\n".to_string();
    }

    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&table.headers).chain(table.rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count().min(MAX_CELL_WIDTH));
        }
    }

    let mut out = String::new();
    push_row(&mut out, &table.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &table.rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        line.push_str(&format!("{:<width$}", truncate(cell, MAX_CELL_WIDTH), width = *width));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesSource;

    #[test]
    fn file_size_examples() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn file_size_rounds_to_two_decimals() {
        // 1234 / 1024 = 1.2050...
        assert_eq!(format_file_size(1234), "1.21 KB");
        // 1.999 KB rounds up to 2.
        assert_eq!(format_file_size(2047), "2 KB");
    }

    #[test]
    fn file_size_stays_in_gb_above_range() {
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn summary_mentions_source_and_notice() {
        let summary = FileSummary {
            name: "a.csv".to_string(),
            rows: 3,
            size: "12 Bytes".to_string(),
            format: "CSV",
        };
        let chart = ChartData {
            source: SeriesSource::Local,
            labels: vec!["x".to_string()],
            values: vec![1.0],
        };
        let txt = format_run_summary(&summary, &chart, Some("Failed to generate prediction."));
        let expected = concat!(
            "=== csvp - CSV preview ===\n",
            "File: a.csv\n",
            "Rows: 3 | Size: 12 Bytes | Format: CSV\n",
            "Chart: Preview (1 points)\n",
            "Notice: Failed to generate prediction.\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn table_aligns_ragged_rows() {
        let table = TablePreview {
            headers: vec!["date".to_string(), "value".to_string()],
            rows: vec![
                vec!["2024-01-01".to_string(), "5".to_string(), "extra".to_string()],
                vec!["x".to_string()],
            ],
        };
        let expected = concat!(
            "date        value\n",
            "----------  -----  -----\n",
            "2024-01-01  5      extra\n",
            "x\n",
        );
        assert_eq!(format_table(&table), expected);
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
