//! `tracing` subscriber setup.
//!
//! The CLI logs to stderr. The TUI owns the terminal, so it only logs when a
//! file is configured; otherwise no subscriber is installed and `tracing`
//! macros are no-ops.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Filter variable, e.g. `NFTG_LOG=nftg=debug`.
pub const ENV_LOG_FILTER: &str = "NFTG_LOG";

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log to stderr (CLI commands).
pub fn init_stderr(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(io::stderr)
        .try_init();
}

/// Log to an append-only file (TUI).
pub fn init_file(path: &Path, verbose: bool) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::usage(format!("Failed to open log file '{}': {e}", path.display())))?;

    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
