//! Upload session: the single active file and everything derived from it.
//!
//! All state changes go through this type so the invariants hold in one place:
//!
//! - at most one `UploadedFile` is live; derived series never outlive it
//! - a failed upload leaves the previous file untouched
//! - asynchronous completions carry an `UploadToken`; a completion whose token
//!   no longer matches is discarded instead of overwriting newer state
//!
//! Upload tokens are checked against the most recently *started* upload.
//! Prediction tokens are checked against the generation of the *active* file,
//! so a prediction for the visible file still lands while a newer upload is
//! being read. They also carry a per-file request number: only the latest
//! prediction started for a file may complete.

use tracing::{debug, info, warn};

use crate::domain::{ChartData, ParsedSeries, PredictionSeries, TablePreview, UploadedFile};
use crate::error::{IngestError, PredictionError};
use crate::parse::{data_rows, parse_series};
use crate::predict::{PREDICTION_FAILED_NOTICE, PredictionOutcome};
use crate::report::{chart_data, prediction_chart_data, table_preview};

/// Identifies the upload an asynchronous result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadToken {
    generation: u64,
    /// Prediction request number; `0` for upload tokens.
    request: u64,
}

/// Whether a completion was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Why a prediction could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionFailure {
    /// The service answered, but not with equal-length arrays.
    ShapeMismatch(String),
    /// Transport error or non-success status.
    RequestFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionState {
    Idle,
    Loading,
    Ready(PredictionSeries),
    Failed(PredictionFailure),
}

#[derive(Debug, Clone)]
struct ActiveUpload {
    generation: u64,
    file: UploadedFile,
    series: ParsedSeries,
    prediction: PredictionState,
    prediction_request: u64,
}

#[derive(Debug, Default)]
pub struct UploadSession {
    generation: u64,
    pending_upload: bool,
    active: Option<ActiveUpload>,
    error: Option<String>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new upload attempt.
    ///
    /// Clears any displayed error. The current file stays visible until the new
    /// one is accepted.
    pub fn begin_upload(&mut self) -> UploadToken {
        self.generation += 1;
        self.pending_upload = true;
        self.error = None;
        UploadToken {
            generation: self.generation,
            request: 0,
        }
    }

    /// Apply the result of decoding/validating an upload.
    pub fn complete_upload(
        &mut self,
        token: UploadToken,
        result: Result<UploadedFile, IngestError>,
    ) -> Completion {
        if token.generation != self.generation {
            debug!(token = token.generation, current = self.generation, "discarding stale upload");
            return Completion::Stale;
        }
        self.pending_upload = false;

        match result {
            Ok(file) => {
                let series = parse_series(file.content());
                let rows = data_rows(file.content()).count();
                info!(name = file.name(), rows, points = series.len(), "upload active");
                self.active = Some(ActiveUpload {
                    generation: token.generation,
                    file,
                    series,
                    prediction: PredictionState::Idle,
                    prediction_request: 0,
                });
            }
            Err(err) => {
                warn!(error = %err, "upload rejected");
                self.error = Some(err.to_string());
            }
        }
        Completion::Applied
    }

    /// Drop the active file, its derived data, and any error.
    ///
    /// In-flight reads and predictions become stale.
    pub fn remove(&mut self) {
        self.generation += 1;
        self.pending_upload = false;
        self.active = None;
        self.error = None;
    }

    /// Move the active file's prediction to `Loading`.
    ///
    /// Returns `None` when there is no active file. Any prediction already in
    /// flight for the file becomes stale.
    pub fn begin_prediction(&mut self) -> Option<UploadToken> {
        let active = self.active.as_mut()?;
        active.prediction_request += 1;
        active.prediction = PredictionState::Loading;
        Some(UploadToken {
            generation: active.generation,
            request: active.prediction_request,
        })
    }

    /// Apply the result of a prediction call.
    pub fn complete_prediction(
        &mut self,
        token: UploadToken,
        result: Result<PredictionOutcome, PredictionError>,
    ) -> Completion {
        let Some(active) = self
            .active
            .as_mut()
            .filter(|a| a.generation == token.generation && a.prediction_request == token.request)
        else {
            debug!(token = token.generation, request = token.request, "discarding stale prediction");
            return Completion::Stale;
        };

        active.prediction = match result {
            Ok(PredictionOutcome::Valid(series)) => {
                info!(points = series.len(), "prediction ready");
                PredictionState::Ready(series)
            }
            Ok(PredictionOutcome::Invalid(reason)) => {
                warn!(%reason, "prediction response rejected");
                PredictionState::Failed(PredictionFailure::ShapeMismatch(reason))
            }
            Err(err) => {
                warn!(error = %err, "prediction request failed");
                PredictionState::Failed(PredictionFailure::RequestFailed(err.to_string()))
            }
        };
        Completion::Applied
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.active.as_ref().map(|a| &a.file)
    }

    pub fn series(&self) -> Option<&ParsedSeries> {
        self.active.as_ref().map(|a| &a.series)
    }

    pub fn prediction(&self) -> Option<&PredictionState> {
        self.active.as_ref().map(|a| &a.prediction)
    }

    /// Ingest error from the latest upload attempt, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Non-fatal notice when the prediction could not be used.
    pub fn prediction_notice(&self) -> Option<&'static str> {
        match self.prediction()? {
            PredictionState::Failed(_) => Some(PREDICTION_FAILED_NOTICE),
            _ => None,
        }
    }

    pub fn is_reading(&self) -> bool {
        self.pending_upload
    }

    /// Chart data: the prediction when one is ready, the local parse otherwise.
    pub fn chart(&self) -> Option<ChartData> {
        let active = self.active.as_ref()?;
        Some(match &active.prediction {
            PredictionState::Ready(prediction) => prediction_chart_data(prediction),
            _ => chart_data(&active.series),
        })
    }

    /// Table preview, always from the local file.
    pub fn table(&self) -> Option<TablePreview> {
        self.file().map(|f| table_preview(f.content()))
    }
}
