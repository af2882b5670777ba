//! Installer discovery and execution.
//!
//! The executor runs every installer of an expansion in path order. Each
//! unit gets its own [`InstallOutcome`]; a failing installer is recorded
//! and the batch moves on to the next one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use crate::classify::{classify, Architecture, VersionTag};
use crate::error::{Result, VcredistError};
use crate::ui::UserInterface;

/// Exit code for a completed installation.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for a completed installation that needs a reboot.
pub const EXIT_REBOOT_REQUIRED: i32 = 3010;

const PASSIVE_SWITCHES: &[&str] = &["/passive", "/norestart"];

/// Unattended switches for an installer generation.
///
/// Unknown generations get the passive switch set of the modern installers.
pub fn switches_for(version: Option<VersionTag>) -> &'static [&'static str] {
    match version {
        Some(VersionTag::V2005) => &["/q"],
        Some(VersionTag::V2008) => &["/qb"],
        Some(VersionTag::V2010)
        | Some(VersionTag::V2012)
        | Some(VersionTag::V2013)
        | Some(VersionTag::V2015)
        | Some(VersionTag::V2017)
        | Some(VersionTag::V2019)
        | Some(VersionTag::V2022)
        | None => PASSIVE_SWITCHES,
    }
}

/// Architectures the host can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostArch {
    /// 32-bit only.
    X86,
    /// 64-bit capable (runs both x86 and x64 installers).
    X64,
}

impl HostArch {
    /// Detect the host from the build target and the Windows processor
    /// environment.
    pub fn detect() -> Self {
        if cfg!(target_pointer_width = "64") {
            return HostArch::X64;
        }
        if cfg!(windows) {
            return Self::from_processor_env(
                std::env::var("PROCESSOR_ARCHITECTURE").ok().as_deref(),
                std::env::var("PROCESSOR_ARCHITEW6432").ok().as_deref(),
            );
        }
        HostArch::X86
    }

    /// Interpret `PROCESSOR_ARCHITECTURE` and `PROCESSOR_ARCHITEW6432`.
    ///
    /// The second variable is only set for a 32-bit process on a 64-bit OS.
    pub fn from_processor_env(architecture: Option<&str>, wow64: Option<&str>) -> Self {
        let is_64 = |name: &str| {
            matches!(
                name.trim().to_uppercase().as_str(),
                "AMD64" | "ARM64" | "IA64" | "X64"
            )
        };

        if wow64.is_some_and(is_64) || architecture.is_some_and(is_64) {
            HostArch::X64
        } else {
            HostArch::X86
        }
    }

    /// Whether an installer built for `arch` can run here.
    pub fn can_run(&self, arch: Architecture) -> bool {
        match arch {
            Architecture::X86 => true,
            Architecture::X64 => *self == HostArch::X64,
        }
    }
}

/// One installer binary found in an expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerUnit {
    /// Absolute path of the binary.
    pub path: PathBuf,
    /// Path relative to the expansion root; defines execution order.
    pub relative_path: PathBuf,
    pub file_name: String,
    pub version: Option<VersionTag>,
    pub arch: Architecture,
}

impl InstallerUnit {
    /// Build a unit and classify it from its file name.
    pub fn from_path(path: PathBuf, relative_path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let classification = classify(&file_name);

        Self {
            path,
            relative_path,
            file_name,
            version: classification.version,
            arch: classification.arch,
        }
    }

    /// The unattended switches for this unit.
    pub fn switches(&self) -> &'static [&'static str] {
        switches_for(self.version)
    }
}

/// Find every installer binary under `expansion`, in relative path order.
///
/// An expansion without installers is a fatal condition.
pub fn discover_units(expansion: &Path) -> Result<Vec<InstallerUnit>> {
    let mut units: Vec<InstallerUnit> = WalkDir::new(expansion)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
        })
        .map(|entry| {
            let path = entry.path().to_path_buf();
            let relative = path
                .strip_prefix(expansion)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            InstallerUnit::from_path(path, relative)
        })
        .collect();

    if units.is_empty() {
        return Err(VcredistError::NoInstallers {
            path: expansion.to_path_buf(),
        });
    }

    units.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(units)
}

/// Final state of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    InstalledRebootRequired,
    Failed,
    SkippedArchMismatch,
    SkippedDryRun,
}

impl InstallStatus {
    /// Map an installer exit code to a status.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(EXIT_SUCCESS) => Self::Installed,
            Some(EXIT_REBOOT_REQUIRED) => Self::InstalledRebootRequired,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Installed => "installed",
            Self::InstalledRebootRequired => "installed-reboot-required",
            Self::Failed => "failed",
            Self::SkippedArchMismatch => "skipped-arch-mismatch",
            Self::SkippedDryRun => "skipped-dry-run",
        };
        f.write_str(s)
    }
}

/// Result of attempting one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub unit: InstallerUnit,
    pub status: InstallStatus,
    /// Process exit code, when a process ran and reported one.
    pub exit_code: Option<i32>,
}

/// Runs one installer binary to completion.
pub trait InstallerRunner {
    /// Run `program` with `args` in `cwd` and wait for it.
    ///
    /// Returns the exit code, or `None` if the process ended without one.
    fn run(&self, program: &Path, args: &[&str], cwd: &Path) -> std::io::Result<Option<i32>>;
}

/// Spawns installers as child processes.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl InstallerRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[&str], cwd: &Path) -> std::io::Result<Option<i32>> {
        let status = Command::new(program).args(args).current_dir(cwd).status()?;
        Ok(status.code())
    }
}

/// Executes installer units in order.
pub struct Executor<'a> {
    runner: &'a dyn InstallerRunner,
    host: HostArch,
    dry_run: bool,
}

impl<'a> Executor<'a> {
    pub fn new(runner: &'a dyn InstallerRunner, host: HostArch, dry_run: bool) -> Self {
        Self {
            runner,
            host,
            dry_run,
        }
    }

    /// Attempt every unit; never stops early.
    pub fn run(&self, units: &[InstallerUnit], ui: &mut dyn UserInterface) -> Vec<InstallOutcome> {
        units.iter().map(|unit| self.run_unit(unit, ui)).collect()
    }

    /// Attempt a single unit.
    pub fn run_unit(&self, unit: &InstallerUnit, ui: &mut dyn UserInterface) -> InstallOutcome {
        if !self.host.can_run(unit.arch) {
            ui.message(&format!(
                "Skipping {} ({} on 32-bit OS)",
                unit.file_name, unit.arch
            ));
            return outcome(unit, InstallStatus::SkippedArchMismatch, None);
        }

        let args = unit.switches();
        ui.message(&format!("Installing {} ({})...", unit.file_name, unit.arch));
        ui.detail(&format!(
            "version {}, arguments: {}",
            unit.version.map(|v| v.as_str()).unwrap_or("unknown"),
            args.join(" ")
        ));

        if self.dry_run {
            ui.warning("Dry-run: installer not executed");
            return outcome(unit, InstallStatus::SkippedDryRun, None);
        }

        let cwd = unit.path.parent().unwrap_or_else(|| Path::new("."));
        let exit_code = match self.runner.run(&unit.path, args, cwd) {
            Ok(code) => code,
            Err(e) => {
                ui.error(&format!("{} could not be started: {}", unit.file_name, e));
                return outcome(unit, InstallStatus::Failed, None);
            }
        };

        let status = InstallStatus::from_exit_code(exit_code);
        let code_label = exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());
        match status {
            InstallStatus::Installed => {
                ui.success(&format!("{} installed (exit code {})", unit.file_name, code_label));
            }
            InstallStatus::InstalledRebootRequired => {
                ui.success(&format!(
                    "{} installed, reboot required (exit code {})",
                    unit.file_name, code_label
                ));
            }
            _ => {
                ui.error(&format!("{} failed (exit code {})", unit.file_name, code_label));
            }
        }

        outcome(unit, status, exit_code)
    }
}

fn outcome(unit: &InstallerUnit, status: InstallStatus, exit_code: Option<i32>) -> InstallOutcome {
    InstallOutcome {
        unit: unit.clone(),
        status,
        exit_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Records every invocation and answers with scripted exit codes.
    #[derive(Default)]
    struct ScriptedRunner {
        codes: HashMap<String, Option<i32>>,
        calls: RefCell<Vec<(String, Vec<String>, PathBuf)>>,
    }

    impl ScriptedRunner {
        fn with_code(mut self, file_name: &str, code: Option<i32>) -> Self {
            self.codes.insert(file_name.to_string(), code);
            self
        }

        fn called(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.0.clone()).collect()
        }
    }

    impl InstallerRunner for ScriptedRunner {
        fn run(&self, program: &Path, args: &[&str], cwd: &Path) -> std::io::Result<Option<i32>> {
            let name = program
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.calls.borrow_mut().push((
                name.clone(),
                args.iter().map(|a| a.to_string()).collect(),
                cwd.to_path_buf(),
            ));
            Ok(self.codes.get(&name).copied().unwrap_or(Some(0)))
        }
    }

    struct BrokenRunner;

    impl InstallerRunner for BrokenRunner {
        fn run(&self, _: &Path, _: &[&str], _: &Path) -> std::io::Result<Option<i32>> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "access denied",
            ))
        }
    }

    fn unit(name: &str) -> InstallerUnit {
        InstallerUnit::from_path(PathBuf::from("/bundle").join(name), PathBuf::from(name))
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"MZ").unwrap();
    }

    #[test]
    fn switch_table_by_generation() {
        assert_eq!(switches_for(Some(VersionTag::V2005)), ["/q"]);
        assert_eq!(switches_for(Some(VersionTag::V2008)), ["/qb"]);
        for tag in &VersionTag::ALL[2..] {
            assert_eq!(switches_for(Some(*tag)), ["/passive", "/norestart"]);
        }
        assert_eq!(switches_for(None), ["/passive", "/norestart"]);
    }

    #[test]
    fn host_from_processor_env() {
        assert_eq!(HostArch::from_processor_env(Some("AMD64"), None), HostArch::X64);
        assert_eq!(HostArch::from_processor_env(Some("x86"), Some("AMD64")), HostArch::X64);
        assert_eq!(HostArch::from_processor_env(Some("ARM64"), None), HostArch::X64);
        assert_eq!(HostArch::from_processor_env(Some("x86"), None), HostArch::X86);
        assert_eq!(HostArch::from_processor_env(None, None), HostArch::X86);
    }

    #[test]
    fn host_can_run() {
        assert!(HostArch::X64.can_run(Architecture::X64));
        assert!(HostArch::X64.can_run(Architecture::X86));
        assert!(HostArch::X86.can_run(Architecture::X86));
        assert!(!HostArch::X86.can_run(Architecture::X64));
    }

    #[test]
    fn status_from_exit_code() {
        assert_eq!(InstallStatus::from_exit_code(Some(0)), InstallStatus::Installed);
        assert_eq!(
            InstallStatus::from_exit_code(Some(3010)),
            InstallStatus::InstalledRebootRequired
        );
        assert_eq!(InstallStatus::from_exit_code(Some(1)), InstallStatus::Failed);
        assert_eq!(InstallStatus::from_exit_code(Some(1603)), InstallStatus::Failed);
        assert_eq!(InstallStatus::from_exit_code(None), InstallStatus::Failed);
    }

    #[test]
    fn x64_on_32bit_host_is_skipped_without_spawning() {
        let runner = ScriptedRunner::default();
        let executor = Executor::new(&runner, HostArch::X86, false);
        let mut ui = MockUI::new();

        let outcomes = executor.run(
            &[unit("vcredist2010_x64.exe"), unit("vc_redist_2022.x64.exe")],
            &mut ui,
        );

        assert!(outcomes
            .iter()
            .all(|o| o.status == InstallStatus::SkippedArchMismatch && o.exit_code.is_none()));
        assert!(runner.called().is_empty());
        assert!(ui.has_message("x64 on 32-bit OS"));
    }

    #[test]
    fn x86_units_still_run_on_32bit_host() {
        let runner = ScriptedRunner::default();
        let executor = Executor::new(&runner, HostArch::X86, false);
        let mut ui = MockUI::new();

        let outcomes = executor.run(
            &[unit("vcredist2010_x64.exe"), unit("vcredist2010_x86.exe")],
            &mut ui,
        );

        assert_eq!(outcomes[0].status, InstallStatus::SkippedArchMismatch);
        assert_eq!(outcomes[1].status, InstallStatus::Installed);
        assert_eq!(runner.called(), vec!["vcredist2010_x86.exe".to_string()]);
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let runner = ScriptedRunner::default()
            .with_code("vcredist2005_x86.exe", Some(1))
            .with_code("vcredist2008_x86.exe", Some(1603))
            .with_code("vcredist2010_x86.exe", Some(3010))
            .with_code("vcredist2012_x86.exe", Some(0));
        let executor = Executor::new(&runner, HostArch::X64, false);
        let mut ui = MockUI::new();

        let outcomes = executor.run(
            &[
                unit("vcredist2005_x86.exe"),
                unit("vcredist2008_x86.exe"),
                unit("vcredist2010_x86.exe"),
                unit("vcredist2012_x86.exe"),
            ],
            &mut ui,
        );

        let statuses: Vec<_> = outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                InstallStatus::Failed,
                InstallStatus::Failed,
                InstallStatus::InstalledRebootRequired,
                InstallStatus::Installed,
            ]
        );
        assert_eq!(outcomes[1].exit_code, Some(1603));
        assert_eq!(runner.called().len(), 4);
        assert!(ui.has_error("vcredist2008_x86.exe failed (exit code 1603)"));
    }

    #[test]
    fn runner_receives_switches_and_working_directory() {
        let runner = ScriptedRunner::default();
        let executor = Executor::new(&runner, HostArch::X64, false);
        let mut ui = MockUI::new();

        executor.run(&[unit("vcredist2005_x86.exe"), unit("setup.exe")], &mut ui);

        let calls = runner.calls.borrow();
        assert_eq!(calls[0].1, vec!["/q".to_string()]);
        assert_eq!(calls[0].2, PathBuf::from("/bundle"));
        assert_eq!(
            calls[1].1,
            vec!["/passive".to_string(), "/norestart".to_string()]
        );
    }

    #[test]
    fn dry_run_never_spawns() {
        let runner = ScriptedRunner::default();
        let executor = Executor::new(&runner, HostArch::X64, true);
        let mut ui = MockUI::new();

        let outcomes = executor.run(
            &[unit("vcredist2013_x86.exe"), unit("vcredist2013_x64.exe")],
            &mut ui,
        );

        assert!(outcomes
            .iter()
            .all(|o| o.status == InstallStatus::SkippedDryRun));
        assert!(runner.called().is_empty());
        assert!(ui.has_warning("Dry-run"));
    }

    #[test]
    fn dry_run_classification_matches_real_run() {
        let units = [
            unit("vcredist2015_2017_x64.exe"),
            unit("vcredist2008_x86.exe"),
            unit("unknown.exe"),
        ];
        let runner = ScriptedRunner::default();
        let mut ui = MockUI::new();

        let dry = Executor::new(&runner, HostArch::X64, true).run(&units, &mut ui);
        let real = Executor::new(&runner, HostArch::X64, false).run(&units, &mut ui);

        let dry_units: Vec<_> = dry.iter().map(|o| &o.unit).collect();
        let real_units: Vec<_> = real.iter().map(|o| &o.unit).collect();
        assert_eq!(dry_units, real_units);
    }

    #[test]
    fn spawn_error_is_a_unit_failure() {
        let executor = Executor::new(&BrokenRunner, HostArch::X64, false);
        let mut ui = MockUI::new();

        let outcomes = executor.run(
            &[unit("vcredist2019_x86.exe"), unit("vcredist2022_x86.exe")],
            &mut ui,
        );

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.status == InstallStatus::Failed));
        assert!(ui.has_error("could not be started"));
    }

    #[test]
    fn discover_sorts_by_relative_path() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b/vcredist2010_x86.exe");
        touch(temp.path(), "a/vcredist2022_x64.exe");
        touch(temp.path(), "vcredist2005_x86.EXE");
        touch(temp.path(), "readme.txt");
        touch(temp.path(), "vc-2005_x86.exe");
        touch(temp.path(), "vc/vcredist2010_x86.exe");

        let units = discover_units(temp.path()).unwrap();
        let order: Vec<_> = units
            .iter()
            .map(|u| u.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(
            order,
            vec![
                "a/vcredist2022_x64.exe",
                "b/vcredist2010_x86.exe",
                "vc/vcredist2010_x86.exe",
                "vc-2005_x86.exe",
                "vcredist2005_x86.EXE",
            ]
        );
        assert_eq!(units[0].version, Some(VersionTag::V2022));
        assert_eq!(units[0].arch, Architecture::X64);
    }

    #[test]
    fn discover_without_installers_is_fatal() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "docs/readme.txt");

        let err = discover_units(temp.path()).unwrap_err();
        assert!(matches!(err, VcredistError::NoInstallers { .. }));
    }
}
