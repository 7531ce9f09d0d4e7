//! Resolved run configuration.
//!
//! CLI flags (with environment fallbacks, see `cli`) are folded into a single
//! `PreviewConfig` so the pipeline and the TUI never look at clap types.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::PreviewArgs;
use crate::error::AppError;
use crate::predict::HttpPredictor;

/// How to reach the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl PredictConfig {
    pub fn build_client(&self) -> Result<HttpPredictor, AppError> {
        HttpPredictor::new(&self.base_url, self.token.clone(), self.timeout)
            .map_err(|e| AppError::new(2, format!("Invalid prediction settings: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    pub file: Option<PathBuf>,
    pub mime: Option<String>,
    /// `None` disables the prediction call.
    pub predict: Option<PredictConfig>,
    pub show_table: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl PreviewConfig {
    pub fn from_args(args: &PreviewArgs) -> Self {
        let predict = (!args.no_predict).then(|| PredictConfig {
            base_url: args.predict_url.clone(),
            token: args.token.clone(),
            timeout: Duration::from_secs(args.timeout_secs.max(1)),
        });

        Self {
            file: args.file.clone(),
            mime: args.mime.clone(),
            predict,
            show_table: !args.no_table,
            plot_width: args.width,
            plot_height: args.height,
            export: args.export.clone(),
            log_file: args.log_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn preview_args(argv: &[&str]) -> PreviewArgs {
        match Cli::parse_from(argv).command {
            Command::Preview(args) | Command::Tui(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_predict_disables_prediction() {
        let cfg = PreviewConfig::from_args(&preview_args(&["csvp", "preview", "--no-predict", "-f", "a.csv"]));
        assert!(cfg.predict.is_none());
        assert_eq!(cfg.file, Some(PathBuf::from("a.csv")));
        assert!(cfg.show_table);
    }

    #[test]
    fn explicit_prediction_settings_are_kept() {
        let cfg = PreviewConfig::from_args(&preview_args(&[
            "csvp",
            "tui",
            "--predict-url",
            "http://example.test/api/",
            "--token",
            "abc",
            "--timeout-secs",
            "0",
            "--no-table",
        ]));
        let predict = cfg.predict.unwrap();
        assert_eq!(predict.base_url, "http://example.test/api/");
        assert_eq!(predict.token.as_deref(), Some("abc"));
        assert_eq!(predict.timeout, Duration::from_secs(1));
        assert!(!cfg.show_table);
    }
}
