//! Run configuration.
//!
//! [`RunContext`] carries the three user-facing switches of a run and
//! [`Settings`] the operational parameters (directories, catalog endpoint,
//! mirror pool, timeouts). Both are built once from the command line and
//! stay unchanged for the whole run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{DEFAULT_CATALOG_URL, DEFAULT_MIRRORS};

/// Name of the per-run log directory under the program directory.
pub const LOG_DIR_NAME: &str = "logs";

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Skip the confirmation prompt.
    pub auto_accept: bool,
    /// Enumerate and classify installers without executing them.
    pub dry_run: bool,
    /// Keep a downloaded bundle after the run.
    pub preserve_download: bool,
}

/// Operational parameters of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory searched for cached bundles and receiving downloads and logs.
    pub base_dir: PathBuf,
    /// Catalog page resolving the latest package.
    pub catalog_url: String,
    /// Mirror identifiers to choose from.
    pub mirrors: Vec<String>,
    /// Timeout for catalog and mirror requests.
    pub metadata_timeout: Duration,
    /// Connect timeout for the bundle transfer.
    pub connect_timeout: Duration,
    /// Deadline for each read of the bundle transfer; a slow but steady
    /// transfer may take longer in total.
    pub download_timeout: Duration,
}

impl Settings {
    /// Default settings rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            metadata_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(15),
            download_timeout: Duration::from_secs(600),
        }
    }

    /// Override the catalog URL.
    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Directory receiving the per-run log files.
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join(LOG_DIR_NAME)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(program_dir())
    }
}

/// Directory containing the running executable.
///
/// Falls back to the current directory when the executable path is unknown.
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.canonicalize().ok().or(Some(exe)))
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
