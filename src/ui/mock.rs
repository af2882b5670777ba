//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use vcredist::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("proceed", "yes");
//!
//! assert!(ui.confirm(&Prompt::confirm("proceed", "Proceed?", false)).unwrap());
//! ui.success("Download complete");
//!
//! assert!(ui.has_success("Download complete"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

use super::prompts::parse_answer;
use super::{OutputMode, ProgressHandle, Prompt, RunSummary, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    details: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    downloads: Vec<(String, Option<u64>)>,
    summaries: Vec<RunSummary>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
    pauses: Vec<String>,
    transferred: Rc<RefCell<u64>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    ///
    /// Unconfigured prompts answer with their default.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured detail lines.
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all transfers started, as (label, advertised length).
    pub fn downloads(&self) -> &[(String, Option<u64>)] {
        &self.downloads
    }

    /// Total bytes reported through every progress handle.
    pub fn transferred(&self) -> u64 {
        *self.transferred.borrow()
    }

    /// Get all captured run summaries.
    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Get all pause messages.
    pub fn pauses(&self) -> &[String] {
        &self.pauses
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn detail(&mut self, msg: &str) {
        self.details.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        self.prompts_shown.push(prompt.key.clone());

        let answer = self
            .prompt_responses
            .get(&prompt.key)
            .and_then(|response| parse_answer(response))
            .unwrap_or(prompt.default);
        Ok(answer)
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn start_download(&mut self, label: &str, total: Option<u64>) -> Box<dyn ProgressHandle> {
        self.downloads.push((label.to_string(), total));
        Box::new(MockProgress {
            transferred: Rc::clone(&self.transferred),
            finished: false,
        })
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn pause(&mut self, msg: &str) {
        self.pauses.push(msg.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock progress handle that counts bytes into its MockUI.
#[derive(Debug)]
pub struct MockProgress {
    transferred: Rc<RefCell<u64>>,
    finished: bool,
}

impl MockProgress {
    /// Whether `finish` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ProgressHandle for MockProgress {
    fn advance(&mut self, bytes: u64) {
        *self.transferred.borrow_mut() += bytes;
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_each_level() {
        let mut ui = MockUI::new();
        ui.message("info");
        ui.detail("args");
        ui.success("ok");
        ui.warning("careful");
        ui.error("broken");
        ui.show_header("Cleanup");

        assert!(ui.has_message("info"));
        assert_eq!(ui.details(), ["args".to_string()]);
        assert!(ui.has_success("ok"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("broken"));
        assert_eq!(ui.headers(), ["Cleanup".to_string()]);
    }

    #[test]
    fn confirm_uses_configured_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("proceed", "n");
        let prompt = Prompt::confirm("proceed", "Proceed?", true);
        assert!(!ui.confirm(&prompt).unwrap());
        assert_eq!(ui.prompts_shown(), ["proceed".to_string()]);
    }

    #[test]
    fn confirm_falls_back_to_default() {
        let mut ui = MockUI::new();
        let prompt = Prompt::confirm("proceed", "Proceed?", true);
        assert!(ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn progress_bytes_are_counted() {
        let mut ui = MockUI::new();
        let mut progress = ui.start_download("bundle.zip", Some(64));
        progress.advance(40);
        progress.advance(24);
        progress.finish();

        assert_eq!(ui.transferred(), 64);
        assert_eq!(ui.downloads(), [("bundle.zip".to_string(), Some(64))]);
    }

    #[test]
    fn pause_is_recorded() {
        let mut ui = MockUI::new();
        ui.pause("Press Enter to exit.");
        assert_eq!(ui.pauses(), ["Press Enter to exit.".to_string()]);
    }
}
