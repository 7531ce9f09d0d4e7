//! Command-line parsing for the CSV previewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the ingest/parse code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::SeriesFormat;
use crate::predict::http::DEFAULT_BASE_URL;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "csvp", version, about = "Preview a CSV file as a chart and table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a CSV, print its summary, chart and table, optionally with a prediction.
    Preview(PreviewArgs),
    /// Print only the parsed (label, value) series (useful for scripting).
    Series(SeriesArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same ingest/parse pipeline as `csvp preview`, but lets you
    /// switch files and renders results in a terminal UI using Ratatui.
    Tui(PreviewArgs),
}

/// Options shared by `preview` and `tui`.
#[derive(Debug, Parser, Clone)]
pub struct PreviewArgs {
    /// CSV file to load. Without it, `preview` prompts and `tui` starts empty.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Declared MIME type of the file (lets non-`.csv` names through when it is CSV).
    #[arg(long)]
    pub mime: Option<String>,

    /// Skip the prediction service and chart the local parse only.
    #[arg(long)]
    pub no_predict: bool,

    /// Base URL of the prediction service.
    #[arg(long, env = "CSVP_PREDICT_URL", default_value = DEFAULT_BASE_URL)]
    pub predict_url: String,

    /// Token sent verbatim in the `Authorization` header.
    #[arg(long, env = "CSVP_PREDICT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Prediction request timeout (seconds).
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Do not print the table preview.
    #[arg(long)]
    pub no_table: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the charted series (`.json` → JSON, otherwise CSV).
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Append logs to this file (the TUI logs nowhere without it).
    #[arg(long, env = "CSVP_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Options for printing the parsed series.
#[derive(Debug, Parser, Clone)]
pub struct SeriesArgs {
    /// CSV file to parse.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Declared MIME type of the file.
    #[arg(long)]
    pub mime: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = SeriesFormat::Csv)]
    pub format: SeriesFormat,
}
