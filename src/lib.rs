//! `csv-preview` library crate.
//!
//! The binary (`csvp`) is a thin wrapper around this library so that:
//!
//! - ingest, parsing and session logic are testable without spawning processes
//! - the CLI commands and the TUI share one pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod parse;
pub mod plot;
pub mod predict;
pub mod report;
pub mod session;
pub mod tui;
