//! Error types.
//!
//! `AppError` is the process-level error: it carries the exit code the binary
//! returns. The typed enums below are the domain errors produced by ingest and
//! by the prediction client; they convert into `AppError` at command boundaries.

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a candidate file was not accepted as the active upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Invalid file type: '{name}'. Please upload a .csv file.")]
    InvalidFileType { name: String },
    #[error("File is too large ({size} bytes). Maximum size is {limit} bytes (10MB).")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("Failed to read '{name}': {message}")]
    Read { name: String, message: String },
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::new(2, err.to_string())
    }
}

/// Failure talking to the prediction service.
///
/// A response that arrives but has the wrong shape is not an error here; it is
/// reported as `PredictionOutcome::Invalid` so callers can fall back explicitly.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("prediction request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("prediction service returned status {0}")]
    Status(u16),
    #[error("prediction service is not configured: {0}")]
    Config(String),
}
