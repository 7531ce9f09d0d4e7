//! CSV text → `ParsedSeries`.
//!
//! The format is deliberately simple: the first non-blank line is a header, a
//! comma always splits a field (no quoting), and only the first two columns of a
//! data row matter. Rows that do not yield a `(label, finite value)` pair are
//! skipped rather than failing the whole parse.

use crate::domain::{ParsedSeries, SERIES_CAP, SeriesPoint};

/// Parse uploaded text into a bounded series.
///
/// Pure and infallible: the same content always yields the same series, and
/// content without data rows yields an empty one.
pub fn parse_series(content: &str) -> ParsedSeries {
    let points = data_rows(content).filter_map(parse_point).take(SERIES_CAP).collect();
    ParsedSeries::from_points(points)
}

/// Non-blank lines after the header, in file order.
pub fn data_rows(content: &str) -> impl Iterator<Item = &str> + '_ {
    non_blank_lines(content).skip(1)
}

/// The header line, if any.
pub fn header_line(content: &str) -> Option<&str> {
    non_blank_lines(content).next()
}

fn non_blank_lines(content: &str) -> impl Iterator<Item = &str> + '_ {
    content.split('\n').filter(|line| !line.trim().is_empty())
}

/// Turn one data row into a point, or `None` if the row is malformed.
pub fn parse_point(row: &str) -> Option<SeriesPoint> {
    let mut fields = row.split(',');
    let label = fields.next()?.trim();
    if label.is_empty() {
        return None;
    }
    let value = parse_value(fields.next()?)?;
    Some(SeriesPoint {
        label: label.to_string(),
        value,
    })
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(series: &ParsedSeries) -> Vec<(String, f64)> {
        series
            .points()
            .iter()
            .map(|p| (p.label.clone(), p.value))
            .collect()
    }

    #[test]
    fn skips_non_numeric_values_and_empty_labels() {
        let series = parse_series("a,b\n1,10\n2,20\n3,x\n,5");
        assert_eq!(
            pairs(&series),
            vec![("1".to_string(), 10.0), ("2".to_string(), 20.0)]
        );
    }

    #[test]
    fn header_only_or_empty_content_is_empty() {
        assert!(parse_series("a,b").is_empty());
        assert!(parse_series("").is_empty());
        assert!(parse_series("\n  \n\t\n").is_empty());
        assert!(parse_series("a,b\n\n   \n").is_empty());
    }

    #[test]
    fn caps_at_first_hundred_points_in_order() {
        let mut content = String::from("day,count\n");
        for i in 0..150 {
            content.push_str(&format!("d{i},{i}\n"));
        }
        let series = parse_series(&content);
        assert_eq!(series.len(), 100);
        assert_eq!(series.points()[0].label, "d0");
        assert_eq!(series.points()[99].label, "d99");
        assert_eq!(series.points()[99].value, 99.0);
    }

    #[test]
    fn cap_counts_only_included_rows() {
        let mut content = String::from("k,v\n");
        for i in 0..120 {
            content.push_str(&format!("bad{i},nope\n"));
            content.push_str(&format!("ok{i},{i}\n"));
        }
        let series = parse_series(&content);
        assert_eq!(series.len(), 100);
        assert!(series.points().iter().all(|p| p.label.starts_with("ok")));
    }

    #[test]
    fn parsing_is_idempotent() {
        let content = "x,y\n2024-01-01, 3.5\nfoo,bar\n2024-01-02,-1e3\n";
        assert_eq!(parse_series(content), parse_series(content));
    }

    #[test]
    fn tolerates_ragged_rows_and_duplicate_labels() {
        let series = parse_series("a,b,c\nx,1,extra,more\nx,2\nonly-one-field\ny\n");
        assert_eq!(
            pairs(&series),
            vec![("x".to_string(), 1.0), ("x".to_string(), 2.0)]
        );
    }

    #[test]
    fn empty_second_column_is_dropped() {
        let series = parse_series("a,b\nx,\ny, \nz,4\n");
        assert_eq!(pairs(&series), vec![("z".to_string(), 4.0)]);
    }

    #[test]
    fn non_finite_literals_are_dropped() {
        let series = parse_series("a,b\nx,NaN\ny,inf\nz,-infinity\nw,7\n");
        assert_eq!(pairs(&series), vec![("w".to_string(), 7.0)]);
    }

    #[test]
    fn values_with_trailing_text_are_dropped() {
        let series = parse_series("a,b\nx,10abc\ny,3.5 kg\nz,0x10\nw,12\n");
        assert_eq!(pairs(&series), vec![("w".to_string(), 12.0)]);
    }

    #[test]
    fn crlf_and_surrounding_whitespace_are_trimmed() {
        let series = parse_series("a,b\r\n  jan , 1.25 \r\nfeb,2\r\n");
        assert_eq!(
            pairs(&series),
            vec![("jan".to_string(), 1.25), ("feb".to_string(), 2.0)]
        );
    }

    #[test]
    fn blank_lines_before_header_are_ignored() {
        assert_eq!(header_line("\n\n a,b\n1,2"), Some(" a,b"));
        assert_eq!(parse_series("\n\na,b\n1,2").len(), 1);
    }
}
