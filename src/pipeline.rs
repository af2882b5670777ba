//! End-to-end installation run.
//!
//! Resolve a bundle, expand it, install every unit and clean up. Once a
//! bundle is in hand cleanup runs on every path out, including fatal ones.

use std::path::PathBuf;
use std::time::Instant;

use crate::cleanup::{reconcile, CleanupReport};
use crate::config::RunContext;
use crate::error::Result;
use crate::executor::{discover_units, Executor, HostArch, InstallOutcome, InstallerRunner};
use crate::expand::{expand, expansion_dir};
use crate::source::{resolve_bundle, Bundle, BundleFetcher};
use crate::ui::{RunSummary, UserInterface};

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub bundle: Bundle,
    pub outcomes: Vec<InstallOutcome>,
    pub cleanup: CleanupReport,
    pub summary: RunSummary,
}

/// The wired installation stages.
pub struct Pipeline<'a> {
    pub base_dir: PathBuf,
    pub ctx: RunContext,
    pub remote: &'a dyn BundleFetcher,
    pub runner: &'a dyn InstallerRunner,
    pub host: HostArch,
}

impl Pipeline<'_> {
    /// Run every stage in order.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<RunReport> {
        let started = Instant::now();

        let bundle = resolve_bundle(&self.base_dir, &self.ctx, self.remote, ui)?;
        tracing::info!(
            "Bundle {} ({:?}, {:?})",
            bundle.path.display(),
            bundle.origin,
            bundle.retention
        );

        let outcomes = match self.install(&bundle, ui) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                reconcile(&bundle, &expansion_dir(&bundle.path), ui);
                return Err(e);
            }
        };

        let cleanup = reconcile(&bundle, &expansion_dir(&bundle.path), ui);
        let summary = RunSummary::from_outcomes(&outcomes, started.elapsed());
        ui.show_run_summary(&summary);

        Ok(RunReport {
            bundle,
            outcomes,
            cleanup,
            summary,
        })
    }

    fn install(&self, bundle: &Bundle, ui: &mut dyn UserInterface) -> Result<Vec<InstallOutcome>> {
        let expansion = expand(&bundle.path, ui)?;

        ui.show_header("Installing");
        let units = discover_units(&expansion.dir)?;
        ui.message(&format!("Found {} installers", units.len()));

        if self.ctx.dry_run {
            ui.warning("Dry-run mode: installers will not be executed");
        }

        let executor = Executor::new(self.runner, self.host, self.ctx.dry_run);
        Ok(executor.run(&units, ui))
    }
}
