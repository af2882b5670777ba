//! Console user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait, the event sink the installer pipeline reports to
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for redirected output and unattended runs
//! - [`MockUI`] capturing every event for tests
//!
//! Every implementation except the mock also forwards its events to
//! `tracing`, so the per-run log file records what the console showed.
//!
//! # Example
//!
//! ```
//! use vcredist::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Extracting Package");
//! ui.success("Extracted 12 files");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod terminal;
pub mod theme;

pub use mock::{MockProgress, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::{format_bytes, format_duration, DownloadProgress};
pub use prompts::confirm_user;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, VcredistTheme};

use std::time::Duration;

use crate::error::Result;
use crate::executor::{InstallOutcome, InstallStatus};

/// Trait for user interface interactions.
///
/// The pipeline depends only on this trait, which allows capturing every
/// event in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display an informational message.
    fn message(&mut self, msg: &str);

    /// Display a detail line (verbose mode only).
    fn detail(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Show a section header.
    fn show_header(&mut self, title: &str);

    /// Start a byte progress indicator for a transfer.
    ///
    /// `total` is the advertised length; `None` means no indicator is shown.
    fn start_download(&mut self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle>;

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Wait for the user to acknowledge before the process exits.
    fn pause(&mut self, _msg: &str) {}

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for a running transfer indicator.
pub trait ProgressHandle {
    /// Record `bytes` more bytes as transferred.
    fn advance(&mut self, bytes: u64);

    /// Remove the indicator.
    fn finish(&mut self);
}

/// A yes/no question to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for lookup in tests).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer used when the user just presses enter or no terminal is attached.
    pub default: bool,
}

impl Prompt {
    /// Create a confirmation prompt.
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            default,
        }
    }
}

/// Aggregated outcome counts for the end-of-run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Units installed with exit code 0.
    pub installed: usize,
    /// Units installed with the reboot-required exit code.
    pub reboot_required: usize,
    /// File names of units that failed.
    pub failed: Vec<String>,
    /// Units skipped because the host cannot run them.
    pub skipped_arch: usize,
    /// Units not executed because of dry-run.
    pub skipped_dry_run: usize,
    /// Wall time of the whole run.
    pub duration: Duration,
}

impl RunSummary {
    /// Build a summary from the executor's outcomes.
    pub fn from_outcomes(outcomes: &[InstallOutcome], duration: Duration) -> Self {
        let mut summary = Self {
            duration,
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome.status {
                InstallStatus::Installed => summary.installed += 1,
                InstallStatus::InstalledRebootRequired => summary.reboot_required += 1,
                InstallStatus::Failed => summary.failed.push(outcome.unit.file_name.clone()),
                InstallStatus::SkippedArchMismatch => summary.skipped_arch += 1,
                InstallStatus::SkippedDryRun => summary.skipped_dry_run += 1,
            }
        }
        summary
    }

    /// Total number of units the summary covers.
    pub fn total(&self) -> usize {
        self.installed
            + self.reboot_required
            + self.failed.len()
            + self.skipped_arch
            + self.skipped_dry_run
    }

    /// Whether any installer asked for a reboot.
    pub fn needs_reboot(&self) -> bool {
        self.reboot_required > 0
    }
}
