//! Post-run cleanup.
//!
//! The expansion is always removed. The bundle goes only when its retention
//! says so. Nothing here can fail the run; problems become warnings and are
//! recorded in the [`CleanupReport`].

use std::fmt;
use std::fs;
use std::path::Path;

use crate::expand::remove_tree_best_effort;
use crate::source::{Bundle, Retention};
use crate::ui::UserInterface;

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupAction {
    Removed,
    Preserved,
    Missing,
    Failed(String),
}

impl fmt::Display for CleanupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupAction::Removed => write!(f, "removed"),
            CleanupAction::Preserved => write!(f, "preserved"),
            CleanupAction::Missing => write!(f, "missing"),
            CleanupAction::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Result of cleaning up after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub bundle: CleanupAction,
    pub expansion: CleanupAction,
}

/// Remove the expansion and, unless preserved, the bundle.
pub fn reconcile(bundle: &Bundle, expansion: &Path, ui: &mut dyn UserInterface) -> CleanupReport {
    ui.show_header("Cleanup");

    let expansion = remove_expansion(expansion, ui);

    let bundle_action = match bundle.retention {
        Retention::Preserve => {
            ui.message(&format!("Package preserved: {}", bundle.file_name()));
            CleanupAction::Preserved
        }
        Retention::DeleteAfterUse => remove_bundle(&bundle.path, ui),
    };

    CleanupReport {
        bundle: bundle_action,
        expansion,
    }
}

fn remove_expansion(dir: &Path, ui: &mut dyn UserInterface) -> CleanupAction {
    if !dir.exists() {
        ui.warning(&format!("Extraction folder not found: {}", dir.display()));
        return CleanupAction::Missing;
    }

    if remove_tree_best_effort(dir, ui) {
        ui.success(&format!("Removed extraction folder {}", dir.display()));
        CleanupAction::Removed
    } else {
        let reason = "some entries could not be removed".to_string();
        ui.warning(&format!(
            "Could not fully remove {}: {}",
            dir.display(),
            reason
        ));
        CleanupAction::Failed(reason)
    }
}

fn remove_bundle(path: &Path, ui: &mut dyn UserInterface) -> CleanupAction {
    if !path.exists() {
        ui.warning(&format!("Package not found: {}", path.display()));
        return CleanupAction::Missing;
    }

    match fs::remove_file(path) {
        Ok(()) => {
            ui.success(&format!("Removed package {}", path.display()));
            CleanupAction::Removed
        }
        Err(e) => {
            ui.warning(&format!("Could not remove {}: {}", path.display(), e));
            CleanupAction::Failed(e.to_string())
        }
    }
}
