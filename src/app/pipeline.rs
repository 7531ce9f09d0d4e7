//! Shared "preview pipeline" logic used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> parse -> adapt -> (optional) prediction merge
//!
//! The TUI drives the same `UploadSession` asynchronously; here every step runs
//! to completion before the next one starts.

use std::path::Path;

use crate::domain::{ChartData, FileSummary, ParsedSeries, SeriesSource, TablePreview};
use crate::error::AppError;
use crate::io::ingest::ingest_path;
use crate::predict::Predictor;
use crate::report::file_summary;
use crate::session::{PredictionState, UploadSession};

/// All computed outputs of a single `csvp preview` run.
#[derive(Debug, Clone)]
pub struct PreviewOutput {
    pub summary: FileSummary,
    pub series: ParsedSeries,
    pub chart: ChartData,
    pub table: TablePreview,
    pub prediction: PredictionState,
    /// Non-fatal notice (prediction fallback).
    pub notice: Option<String>,
}

/// Load `path` into a fresh session, failing on ingest errors.
pub fn load_session(path: &Path, mime: Option<&str>) -> Result<UploadSession, AppError> {
    let mut session = UploadSession::new();
    let token = session.begin_upload();
    session.complete_upload(token, ingest_path(path, mime));
    if let Some(err) = session.error() {
        return Err(AppError::new(2, err));
    }
    Ok(session)
}

/// Execute the full preview pipeline and return the computed outputs.
pub fn run_preview(
    path: &Path,
    mime: Option<&str>,
    predictor: Option<&dyn Predictor>,
) -> Result<PreviewOutput, AppError> {
    let mut session = load_session(path, mime)?;

    if let Some(predictor) = predictor {
        if let (Some(token), Some(file)) = (session.begin_prediction(), session.file().cloned()) {
            let result = predictor.predict(&file);
            session.complete_prediction(token, result);
        }
    }

    collect_output(&session)
}

fn collect_output(session: &UploadSession) -> Result<PreviewOutput, AppError> {
    let file = session
        .file()
        .ok_or_else(|| AppError::new(4, "No active file after ingest."))?;

    Ok(PreviewOutput {
        summary: file_summary(file),
        series: session.series().cloned().unwrap_or_default(),
        chart: session
            .chart()
            .unwrap_or_else(|| ChartData::empty(SeriesSource::Local)),
        table: session.table().unwrap_or_default(),
        prediction: session.prediction().cloned().unwrap_or(PredictionState::Idle),
        notice: session.prediction_notice().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::UploadedFile;
    use crate::error::PredictionError;
    use crate::predict::{PREDICTION_FAILED_NOTICE, PredictionOutcome, validate_parts};

    struct FixedPredictor {
        dates: Vec<&'static str>,
        values: Vec<f64>,
        calls: AtomicUsize,
    }

    impl Predictor for FixedPredictor {
        fn predict(&self, file: &UploadedFile) -> Result<PredictionOutcome, PredictionError> {
            assert!(file.content().starts_with("date,value"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(validate_parts(
                self.dates.iter().map(|s| s.to_string()).collect(),
                self.values.clone(),
            ))
        }
    }

    struct DownPredictor;

    impl Predictor for DownPredictor {
        fn predict(&self, _file: &UploadedFile) -> Result<PredictionOutcome, PredictionError> {
            Err(PredictionError::Status(503))
        }
    }

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "{content}").unwrap();
        tmp
    }

    #[test]
    fn local_only_preview() {
        let tmp = csv_file("date,value\n2024-01-01,1\n2024-01-02,oops\n2024-01-03,3\n");
        let out = run_preview(tmp.path(), None, None).unwrap();

        assert_eq!(out.summary.rows, 4);
        assert_eq!(out.series.len(), 2);
        assert_eq!(out.chart.source, SeriesSource::Local);
        assert_eq!(out.chart.labels, vec!["2024-01-01", "2024-01-03"]);
        // The table shows every row, including ones the series skipped.
        assert_eq!(out.table.rows.len(), 3);
        assert_eq!(out.prediction, PredictionState::Idle);
        assert!(out.notice.is_none());
    }

    #[test]
    fn prediction_overrides_chart() {
        let tmp = csv_file("date,value\n2024-01-01,1\n");
        let predictor = FixedPredictor {
            dates: vec!["2024-02-01", "2024-02-02"],
            values: vec![4.0, 5.0],
            calls: AtomicUsize::new(0),
        };
        let out = run_preview(tmp.path(), None, Some(&predictor)).unwrap();

        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(out.chart.source, SeriesSource::Prediction);
        assert_eq!(out.chart.values, vec![4.0, 5.0]);
        assert_eq!(out.series.len(), 1);
        assert!(out.notice.is_none());
    }

    #[test]
    fn mismatched_prediction_falls_back_to_local() {
        let tmp = csv_file("date,value\n2024-01-01,1\n");
        let predictor = FixedPredictor {
            dates: vec!["2024-02-01", "2024-02-02"],
            values: vec![4.0],
            calls: AtomicUsize::new(0),
        };
        let out = run_preview(tmp.path(), None, Some(&predictor)).unwrap();

        assert_eq!(out.chart.source, SeriesSource::Local);
        assert_eq!(out.chart.values, vec![1.0]);
        assert_eq!(out.notice.as_deref(), Some(PREDICTION_FAILED_NOTICE));
    }

    #[test]
    fn unreachable_service_falls_back_to_local() {
        let tmp = csv_file("date,value\n2024-01-01,1\n");
        let out = run_preview(tmp.path(), None, Some(&DownPredictor)).unwrap();
        assert_eq!(out.chart.source, SeriesSource::Local);
        assert_eq!(out.notice.as_deref(), Some(PREDICTION_FAILED_NOTICE));
    }

    #[test]
    fn ingest_errors_are_fatal_with_exit_code_two() {
        let mut tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(tmp, "a,b\n").unwrap();
        let err = run_preview(tmp.path(), None, None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Invalid file type"));
    }
}
