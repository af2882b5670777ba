//! Run command implementation.
//!
//! Confirms with the user, then drives the installation pipeline against the
//! real catalog, fetcher and process runner.

use std::path::PathBuf;

use crate::catalog::CatalogClient;
use crate::config::{RunContext, Settings};
use crate::error::Result;
use crate::executor::{HostArch, InstallerRunner, ProcessRunner};
use crate::fetch::Fetcher;
use crate::pipeline::Pipeline;
use crate::source::{BundleFetcher, RemoteSource};
use crate::ui::{format_duration, Prompt, UserInterface};

/// Title shown when a run starts.
pub const BANNER: &str = "Visual C++ Redistributable All-in-One Installer";

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to use.
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

/// The run command implementation.
pub struct RunCommand {
    settings: Settings,
    context: RunContext,
    log_path: Option<PathBuf>,
    host: HostArch,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(settings: Settings, context: RunContext) -> Self {
        Self {
            settings,
            context,
            log_path: None,
            host: HostArch::detect(),
        }
    }

    /// Report `path` as the log file at the end of the run.
    pub fn with_log_path(mut self, path: Option<PathBuf>) -> Self {
        self.log_path = path;
        self
    }

    /// Override the detected host architecture.
    pub fn with_host(mut self, host: HostArch) -> Self {
        self.host = host;
        self
    }

    /// Execute against the network and real installer processes.
    pub fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalog = CatalogClient::new(&self.settings)?;
        let remote = RemoteSource::new(catalog, Fetcher::new(&self.settings)?);
        self.execute_with(&remote, &ProcessRunner, ui)
    }

    /// Execute with the given download source and process runner.
    pub fn execute_with(
        &self,
        remote: &dyn BundleFetcher,
        runner: &dyn InstallerRunner,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        ui.show_header(BANNER);
        ui.detail(&format!("Program directory: {}", self.settings.base_dir.display()));
        ui.detail(&format!("Host architecture: {:?}", self.host));

        if !self.context.auto_accept {
            let prompt = Prompt::confirm(
                "proceed",
                "Download and install all Visual C++ runtimes?",
                false,
            );
            if !ui.confirm(&prompt)? {
                ui.message("Aborted by user.");
                return Ok(CommandResult::success());
            }
        }

        let pipeline = Pipeline {
            base_dir: self.settings.base_dir.clone(),
            ctx: self.context,
            remote,
            runner,
            host: self.host,
        };
        let report = pipeline.run(ui)?;

        if let Some(path) = &self.log_path {
            ui.message(&format!("Log written to {}", path.display()));
        }

        ui.show_header("Completed");
        ui.success(&format!(
            "Finished in {}",
            format_duration(report.summary.duration)
        ));

        if !self.context.auto_accept && ui.is_interactive() {
            ui.pause("Press Enter to exit...");
        }

        Ok(CommandResult::success())
    }
}
