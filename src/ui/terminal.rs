//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::progress::format_duration;
use super::{
    confirm_user, should_use_colors, DownloadProgress, NonInteractiveUI, OutputMode,
    ProgressHandle, Prompt, RunSummary, UserInterface, VcredistTheme,
};

const RULE_WIDTH: usize = 70;

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: VcredistTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            VcredistTheme::new()
        } else {
            VcredistTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        tracing::info!("{}", msg);
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_info(msg)).ok();
        }
    }

    fn detail(&mut self, msg: &str) {
        tracing::debug!("{}", msg);
        if self.mode.shows_details() {
            writeln!(self.term, "           {}", self.theme.dim.apply_to(msg)).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        tracing::info!("SUCCESS: {}", msg);
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        tracing::warn!("{}", msg);
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        tracing::error!("{}", msg);
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let answer = confirm_user(prompt, &self.term)?;
        tracing::info!("Prompt '{}' answered: {}", prompt.key, answer);
        Ok(answer)
    }

    fn show_header(&mut self, title: &str) {
        tracing::info!("== {} ==", title);
        if self.mode.shows_status() {
            writeln!(self.term).ok();
            writeln!(self.term, "{}", self.theme.format_rule(title, RULE_WIDTH)).ok();
        }
    }

    fn start_download(&mut self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle> {
        match total {
            Some(total) if total > 0 && self.mode.shows_progress() => {
                Box::new(DownloadProgress::new(label, total))
            }
            _ => Box::new(DownloadProgress::hidden()),
        }
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

        let t = &self.theme;
        writeln!(self.term).ok();
        writeln!(self.term, "{}", t.format_rule("Summary", RULE_WIDTH)).ok();
        writeln!(
            self.term,
            "  {} installed {} {} reboot required {} {} failed {} {} skipped",
            t.success.apply_to(summary.installed),
            t.dim.apply_to("·"),
            t.warning.apply_to(summary.reboot_required),
            t.dim.apply_to("·"),
            t.error.apply_to(summary.failed.len()),
            t.dim.apply_to("·"),
            summary.skipped_arch + summary.skipped_dry_run,
        )
        .ok();
        for name in &summary.failed {
            writeln!(self.term, "  {} {}", t.error.apply_to("✗"), t.file.apply_to(name)).ok();
        }
        if summary.needs_reboot() {
            writeln!(
                self.term,
                "  {}",
                t.warning.apply_to("A reboot is required to finish installation.")
            )
            .ok();
        }
        writeln!(
            self.term,
            "  {}",
            t.dim
                .apply_to(format!("Total: {}", format_duration(summary.duration)))
        )
        .ok();
    }

    fn pause(&mut self, msg: &str) {
        writeln!(self.term, "\n{}", msg).ok();
        self.term.read_line().ok();
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
