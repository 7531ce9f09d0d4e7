//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - ingests and parses the CSV
//! - calls the prediction service (optional)
//! - prints summary/plot/table and writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, PreviewArgs, SeriesArgs};
use crate::config::PreviewConfig;
use crate::domain::{ChartData, SeriesSource};
use crate::error::AppError;
use crate::predict::Predictor;

pub mod pipeline;

/// Entry point for the `csvp` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `csvp` and `csvp -f data.csv` to behave like `csvp tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Preview(args) => handle_preview(&args),
        Command::Series(args) => handle_series(&args),
        Command::Tui(args) => handle_tui(&args),
    }
}

fn handle_preview(args: &PreviewArgs) -> Result<(), AppError> {
    let config = PreviewConfig::from_args(args);
    crate::logging::init(config.log_file.as_deref())?;

    let path = resolve_path(config.file.clone())?;
    let predictor = match &config.predict {
        Some(predict) => Some(predict.build_client()?),
        None => None,
    };

    let out = pipeline::run_preview(
        &path,
        config.mime.as_deref(),
        predictor.as_ref().map(|p| p as &dyn Predictor),
    )?;

    println!(
        "{}",
        crate::report::format_run_summary(&out.summary, &out.chart, out.notice.as_deref())
    );
    print!(
        "{}",
        crate::plot::render_ascii_chart(&out.chart, config.plot_width, config.plot_height)
    );

    if config.show_table {
        println!();
        print!("{}", crate::report::format_table(&out.table));
    }

    if let Some(path) = &config.export {
        crate::io::export::export_series(path, &out.chart)?;
    }

    Ok(())
}

fn handle_series(args: &SeriesArgs) -> Result<(), AppError> {
    crate::logging::init(None)?;

    let path = resolve_path(args.file.clone())?;
    let session = pipeline::load_session(&path, args.mime.as_deref())?;
    let chart = session
        .series()
        .map(crate::report::chart_data)
        .unwrap_or_else(|| ChartData::empty(SeriesSource::Local));

    crate::io::export::write_series(std::io::stdout().lock(), &chart, args.format)
}

fn handle_tui(args: &PreviewArgs) -> Result<(), AppError> {
    let config = PreviewConfig::from_args(args);
    crate::logging::init_quiet(config.log_file.as_deref())?;
    crate::tui::run(config)
}

fn resolve_path(file: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match file {
        Some(path) => Ok(path),
        None => crate::cli::picker::prompt_for_csv_path(),
    }
}

/// Rewrite argv so `csvp` defaults to `csvp tui`.
///
/// Rules:
/// - `csvp`                      -> `csvp tui`
/// - `csvp -f data.csv ...`      -> `csvp tui -f data.csv ...`
/// - `csvp --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "preview" | "series" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
