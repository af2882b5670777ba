//! Non-interactive UI for redirected output and unattended runs.

use crate::error::Result;

use super::progress::format_duration;
use super::theme::VcredistTheme;
use super::{DownloadProgress, OutputMode, ProgressHandle, Prompt, RunSummary, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Output is plain text without progress bars. Prompts are never shown:
/// they resolve to their default answer.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: VcredistTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: VcredistTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        tracing::info!("{}", msg);
        if self.mode.shows_status() {
            println!("{}", self.theme.format_info(msg));
        }
    }

    fn detail(&mut self, msg: &str) {
        tracing::debug!("{}", msg);
        if self.mode.shows_details() {
            println!("           {}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        tracing::info!("SUCCESS: {}", msg);
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        tracing::warn!("{}", msg);
        eprintln!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        tracing::error!("{}", msg);
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        tracing::info!(
            "Prompt '{}' answered with default in non-interactive mode: {}",
            prompt.key,
            prompt.default
        );
        Ok(prompt.default)
    }

    fn show_header(&mut self, title: &str) {
        tracing::info!("== {} ==", title);
        if self.mode.shows_status() {
            println!("\n== {} ==", title);
        }
    }

    fn start_download(&mut self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle> {
        if let Some(total) = total {
            if self.mode.shows_status() {
                println!("Downloading {} ({} bytes)", label, total);
            }
        }
        Box::new(DownloadProgress::hidden())
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        tracing::info!(
            installed = summary.installed,
            reboot_required = summary.reboot_required,
            failed = summary.failed.len(),
            skipped_arch = summary.skipped_arch,
            skipped_dry_run = summary.skipped_dry_run,
            "Run summary"
        );
        println!(
            "\nSummary: {} installed, {} reboot required, {} failed, {} skipped ({})",
            summary.installed,
            summary.reboot_required,
            summary.failed.len(),
            summary.skipped_arch + summary.skipped_dry_run,
            format_duration(summary.duration),
        );
        for name in &summary.failed {
            println!("  failed: {}", name);
        }
        if summary.needs_reboot() {
            println!("A reboot is required to finish installation.");
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
