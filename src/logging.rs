//! Per-run log file.
//!
//! Every run writes one timestamped file under the `logs` directory. The
//! console UI forwards its events to `tracing`, so the file mirrors what the
//! user saw plus debug records.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the log file for a run started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!(
        "vcredist_install_{}.log",
        started.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Build the level filter.
///
/// `--debug` forces debug output; otherwise `RUST_LOG` is honoured and the
/// default is info.
pub fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("vcredist=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vcredist=info"))
    }
}

/// Install the global subscriber writing to a new file in `log_dir`.
///
/// With `debug`, records are mirrored to stderr as well. Returns the path
/// of the log file.
pub fn init_logging(log_dir: &Path, debug: bool) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let path = log_dir.join(log_file_name(Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file));

    let stderr_layer = debug.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(env_filter(debug))
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(path)
}
