//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{program_dir, RunContext, Settings};
use crate::ui::OutputMode;

/// vcredist - Download and install every Visual C++ Redistributable runtime.
#[derive(Debug, Parser)]
#[command(name = "vcredist")]
#[command(author, version, long_about = None)]
#[command(
    about = "Download and install every Visual C++ Redistributable runtime from the All-in-One package"
)]
pub struct Cli {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub auto_accept: bool,

    /// Extract and classify installers without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Keep the downloaded package after installation
    #[arg(long)]
    pub preserve_download: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Directory searched for cached packages (defaults to the program directory)
    #[arg(long, env = "VCREDIST_BASE_DIR", hide = true)]
    pub base_dir: Option<PathBuf>,

    /// Catalog page resolving the latest package
    #[arg(long, env = "VCREDIST_CATALOG_URL", hide = true)]
    pub catalog_url: Option<String>,
}

impl Cli {
    /// Output mode selected by `--verbose` / `--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    /// Per-run switches.
    pub fn run_context(&self) -> RunContext {
        RunContext {
            auto_accept: self.auto_accept,
            dry_run: self.dry_run,
            preserve_download: self.preserve_download,
        }
    }

    /// Operational settings with overrides applied.
    pub fn settings(&self) -> Settings {
        let base_dir = self.base_dir.clone().unwrap_or_else(program_dir);
        let settings = Settings::new(base_dir);
        match &self.catalog_url {
            Some(url) => settings.with_catalog_url(url.clone()),
            None => settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_CATALOG_URL;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["vcredist"]);
        assert_eq!(cli.run_context(), RunContext::default());
        assert_eq!(cli.output_mode(), OutputMode::Normal);
        assert!(!cli.debug);
    }

    #[test]
    fn run_flags() {
        let cli = Cli::parse_from([
            "vcredist",
            "--auto-accept",
            "--dry-run",
            "--preserve-download",
        ]);
        let ctx = cli.run_context();
        assert!(ctx.auto_accept);
        assert!(ctx.dry_run);
        assert!(ctx.preserve_download);
    }

    #[test]
    fn output_mode_flags() {
        assert_eq!(
            Cli::parse_from(["vcredist", "-v"]).output_mode(),
            OutputMode::Verbose
        );
        assert_eq!(
            Cli::parse_from(["vcredist", "--quiet"]).output_mode(),
            OutputMode::Quiet
        );
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["vcredist", "-v", "-q"]).is_err());
    }

    #[test]
    fn overrides_reach_settings() {
        let cli = Cli::parse_from([
            "vcredist",
            "--base-dir",
            "/opt/vc",
            "--catalog-url",
            "http://127.0.0.1:9/aio/",
        ]);
        let settings = cli.settings();
        assert_eq!(settings.base_dir, PathBuf::from("/opt/vc"));
        assert_eq!(settings.catalog_url, "http://127.0.0.1:9/aio/");
    }

    #[test]
    fn default_catalog_without_override() {
        let cli = Cli::parse_from(["vcredist", "--base-dir", "/opt/vc"]);
        assert_eq!(cli.settings().catalog_url, DEFAULT_CATALOG_URL);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["vcredist", "--workflow", "x"]).is_err());
    }
}
