//! Archive expansion.
//!
//! Unpacks a bundle into a fresh directory next to it. Whatever sat at the
//! target path before is removed first; entries are never merged into an
//! older tree.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Result, VcredistError};
use crate::ui::UserInterface;

/// An unpacked bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub dir: PathBuf,
    /// Number of files written.
    pub files: usize,
}

/// Directory a bundle expands into: its path without the extension.
pub fn expansion_dir(bundle: &Path) -> PathBuf {
    let dir = bundle.with_extension("");
    if dir == bundle {
        let mut name = bundle.as_os_str().to_owned();
        name.push(".d");
        PathBuf::from(name)
    } else {
        dir
    }
}

/// Unpack `bundle` into its expansion directory.
pub fn expand(bundle: &Path, ui: &mut dyn UserInterface) -> Result<Expansion> {
    ui.show_header("Extracting");
    let dir = expansion_dir(bundle);

    if dir.exists() {
        ui.detail(&format!("Removing previous extraction {}", dir.display()));
        remove_tree_best_effort(&dir, ui);
    }

    let unreadable = |message: String| VcredistError::ArchiveUnreadable {
        path: bundle.to_path_buf(),
        message,
    };

    let file = File::open(bundle).map_err(|e| unreadable(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| unreadable(e.to_string()))?;
    fs::create_dir_all(&dir)?;

    let mut files = 0;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| unreadable(e.to_string()))?;

        let Some(relative) = entry.enclosed_name() else {
            ui.warning(&format!("Skipping unsafe archive entry {}", entry.name()));
            continue;
        };
        let target = dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out).map_err(|e| unreadable(e.to_string()))?;
        files += 1;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
            }
        }
    }

    tracing::debug!("Extracted {} files to {}", files, dir.display());
    ui.success(&format!("Extracted {} files", files));

    Ok(Expansion { dir, files })
}

/// Remove `dir` and everything under it, continuing past failures.
///
/// Each entry that cannot be removed is reported as a warning. Returns
/// whether the directory is gone afterwards.
pub fn remove_tree_best_effort(dir: &Path, ui: &mut dyn UserInterface) -> bool {
    if fs::remove_dir_all(dir).is_ok() {
        return true;
    }

    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                ui.warning(&format!("Could not read {}: {}", dir.display(), e));
                continue;
            }
        };
        let path = entry.path();
        let removed = if entry.file_type().is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };
        if let Err(e) = removed {
            ui.warning(&format!("Could not remove {}: {}", path.display(), e));
        }
    }

    !dir.exists()
}
