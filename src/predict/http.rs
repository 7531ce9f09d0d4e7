//! HTTP client for the prediction service.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::AUTHORIZATION;
use tracing::{debug, warn};

use super::{PredictionOutcome, Predictor, validate_response};
use crate::domain::UploadedFile;
use crate::error::PredictionError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpPredictor {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpPredictor {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, PredictionError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(PredictionError::Config("empty prediction URL".to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: predict_endpoint(base_url),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, file: &UploadedFile) -> Result<PredictionOutcome, PredictionError> {
        let part = Part::text(file.content().to_string())
            .file_name(file.name().to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let mut req = self.client.post(&self.endpoint).multipart(form);
        // The service expects the raw token, without a scheme prefix.
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, token.as_str());
        }

        debug!(endpoint = %self.endpoint, name = file.name(), "sending prediction request");
        let resp = req.send()?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "prediction request rejected");
            return Err(PredictionError::Status(status.as_u16()));
        }

        let body = resp.bytes()?;
        Ok(validate_response(&body))
    }
}

/// Join `base_url` and the `predict` route with exactly one slash.
fn predict_endpoint(base_url: &str) -> String {
    format!("{}/predict", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_trailing_slash() {
        assert_eq!(predict_endpoint("http://localhost:8000/"), "http://localhost:8000/predict");
        assert_eq!(predict_endpoint("http://localhost:8000"), "http://localhost:8000/predict");
        assert_eq!(predict_endpoint("https://api.example.com/v1//"), "https://api.example.com/v1/predict");
    }

    #[test]
    fn empty_url_is_a_config_error() {
        let err = HttpPredictor::new("  ", None, DEFAULT_TIMEOUT).err().unwrap();
        assert!(matches!(err, PredictionError::Config(_)));
    }

    #[test]
    fn blank_token_is_dropped() {
        let p = HttpPredictor::new(DEFAULT_BASE_URL, Some("  ".to_string()), DEFAULT_TIMEOUT).unwrap();
        assert!(p.token.is_none());
        assert_eq!(p.endpoint(), "http://localhost:8000/predict");
    }
}
