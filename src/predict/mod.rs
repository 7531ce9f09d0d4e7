//! Prediction service boundary.
//!
//! The service is an opaque collaborator: it receives the uploaded CSV and
//! answers with `{dates: [...], predictions: [...]}`. Responses are validated
//! here, before anything downstream sees them, into a tagged outcome.

pub mod http;

pub use http::HttpPredictor;

use serde::Deserialize;

use crate::domain::{PredictionSeries, UploadedFile};
use crate::error::PredictionError;

/// Notice shown when a prediction cannot be used.
pub const PREDICTION_FAILED_NOTICE: &str = "Failed to generate prediction.";

/// Result of a prediction call that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Valid(PredictionSeries),
    Invalid(String),
}

/// Anything that can turn an upload into a prediction.
pub trait Predictor: Send + Sync {
    fn predict(&self, file: &UploadedFile) -> Result<PredictionOutcome, PredictionError>;
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    dates: Vec<String>,
    predictions: Vec<f64>,
}

/// Validate a raw response body.
pub fn validate_response(body: &[u8]) -> PredictionOutcome {
    let response: PredictionResponse = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => return PredictionOutcome::Invalid(format!("unexpected response shape: {e}")),
    };
    validate_parts(response.dates, response.predictions)
}

/// Validate already-decoded arrays.
pub fn validate_parts(dates: Vec<String>, predictions: Vec<f64>) -> PredictionOutcome {
    if dates.len() != predictions.len() {
        return PredictionOutcome::Invalid(format!(
            "length mismatch: {} dates vs {} predictions",
            dates.len(),
            predictions.len()
        ));
    }
    if let Some(idx) = predictions.iter().position(|v| !v.is_finite()) {
        return PredictionOutcome::Invalid(format!("non-finite prediction at index {idx}"));
    }
    PredictionOutcome::Valid(PredictionSeries::new_unchecked(dates, predictions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_length_response_is_valid() {
        let body = br#"{"dates":["2024-01-01","2024-01-02"],"predictions":[1.0,2.5]}"#;
        let PredictionOutcome::Valid(series) = validate_response(body) else {
            panic!("expected a valid outcome");
        };
        assert_eq!(series.dates(), ["2024-01-01", "2024-01-02"]);
        assert_eq!(series.predictions(), [1.0, 2.5]);
    }

    #[test]
    fn length_mismatch_is_invalid() {
        let body = br#"{"dates":["a","b","c"],"predictions":[1.0]}"#;
        assert!(matches!(validate_response(body), PredictionOutcome::Invalid(_)));
    }

    #[test]
    fn wrong_shape_is_invalid() {
        for body in [
            &br#"{"dates":["a"]}"#[..],
            br#"{"dates":"a","predictions":[1]}"#,
            br#"{"dates":["a"],"predictions":["x"]}"#,
            br#"[1,2,3]"#,
            b"not json",
        ] {
            assert!(
                matches!(validate_response(body), PredictionOutcome::Invalid(_)),
                "body should be invalid: {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = br#"{"dates":[],"predictions":[],"model":"v2"}"#;
        let PredictionOutcome::Valid(series) = validate_response(body) else {
            panic!("expected a valid outcome");
        };
        assert!(series.is_empty());
    }

    #[test]
    fn non_finite_values_are_invalid() {
        let outcome = validate_parts(vec!["a".to_string()], vec![f64::NAN]);
        assert!(matches!(outcome, PredictionOutcome::Invalid(_)));
    }
}
