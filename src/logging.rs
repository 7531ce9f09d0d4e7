//! Tracing subscriber setup.
//!
//! Level comes from `RUST_LOG` (default `warn`). Non-interactive commands log
//! to stderr; the TUI owns the terminal, so it only logs when given a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr, or to `log_file` when given.
pub fn init(log_file: Option<&Path>) -> Result<(), AppError> {
    match log_file {
        Some(path) => init_file(path),
        None => {
            // A subscriber may already be installed (e.g. by a test harness).
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
            Ok(())
        }
    }
}

/// Log to `log_file` only; without one, logging stays off.
pub fn init_quiet(log_file: Option<&Path>) -> Result<(), AppError> {
    match log_file {
        Some(path) => init_file(path),
        None => Ok(()),
    }
}

fn init_file(path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
