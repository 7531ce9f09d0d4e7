//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - held by the upload session while the UI redraws
//! - exported to JSON/CSV
//! - compared structurally in tests

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Largest file accepted by ingest (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of points in a parsed series.
pub const SERIES_CAP: usize = 100;

/// Where the bytes of a candidate file live.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file offered for upload, before validation.
///
/// `mime` is the declared content type, when the caller has one (a file picker
/// or HTTP form usually does; a bare filesystem path does not).
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
    pub mime: Option<String>,
    pub source: CandidateSource,
}

impl FileCandidate {
    pub fn from_bytes(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime,
            source: CandidateSource::Bytes(bytes),
        }
    }
}

/// The active upload.
///
/// Immutable once built: a new upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    name: String,
    size: u64,
    content: String,
    row_count: usize,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size: u64, content: String) -> Self {
        let row_count = count_non_blank_lines(&content);
        Self {
            name: name.into(),
            size,
            content,
            row_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of non-blank lines, header included.
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

fn count_non_blank_lines(content: &str) -> usize {
    content.split('\n').filter(|line| !line.trim().is_empty()).count()
}

/// One `(label, value)` point of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Points derived from the data rows of an `UploadedFile`.
///
/// Every point has a non-empty label and a finite value; the length never
/// exceeds `SERIES_CAP`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSeries {
    points: Vec<SeriesPoint>,
}

impl ParsedSeries {
    /// Build a series from already-validated points, truncating to the cap.
    pub(crate) fn from_points(mut points: Vec<SeriesPoint>) -> Self {
        points.truncate(SERIES_CAP);
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A prediction returned by the external service.
///
/// Only constructible through boundary validation, so `dates` and
/// `predictions` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSeries {
    dates: Vec<String>,
    predictions: Vec<f64>,
}

impl PredictionSeries {
    pub(crate) fn new_unchecked(dates: Vec<String>, predictions: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), predictions.len());
        Self { dates, predictions }
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Which series ended up on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesSource {
    /// Parsed locally from the uploaded file.
    Local,
    /// Returned by the prediction service.
    Prediction,
}

impl SeriesSource {
    pub fn display_name(self) -> &'static str {
        match self {
            SeriesSource::Local => "Preview",
            SeriesSource::Prediction => "Prediction",
        }
    }
}

/// Parallel label/value arrays consumed by chart renderers.
///
/// `labels[i]` and `values[i]` always describe the same point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub source: SeriesSource,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    pub fn empty(source: SeriesSource) -> Self {
        Self {
            source,
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// All columns of all rows, for the table view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Summary statistics shown next to the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub rows: usize,
    pub size: String,
    pub format: &'static str,
}

/// Output format for `csvp series` and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeriesFormat {
    Csv,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_count_ignores_blank_lines() {
        let file = UploadedFile::new("a.csv", 20, "a,b\n\n1,2\n   \n3,4\n".to_string());
        assert_eq!(file.row_count(), 3);
    }

    #[test]
    fn row_count_of_empty_content_is_zero() {
        let file = UploadedFile::new("a.csv", 0, String::new());
        assert_eq!(file.row_count(), 0);
    }

    #[test]
    fn parsed_series_truncates_to_cap() {
        let points = (0..SERIES_CAP + 7)
            .map(|i| SeriesPoint {
                label: i.to_string(),
                value: i as f64,
            })
            .collect();
        let series = ParsedSeries::from_points(points);
        assert_eq!(series.len(), SERIES_CAP);
        assert_eq!(series.points().last().unwrap().label, (SERIES_CAP - 1).to_string());
    }
}
