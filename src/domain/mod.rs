//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - upload inputs and the active file (`FileCandidate`, `UploadedFile`)
//! - derived series (`ParsedSeries`, `PredictionSeries`)
//! - presentation shapes (`ChartData`, `TablePreview`, `FileSummary`)

pub mod types;

pub use types::*;
