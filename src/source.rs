//! Bundle source resolution.
//!
//! A bundle already sitting in the program directory always wins over the
//! network. Only when none is found is the catalog consulted and the latest
//! package downloaded.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{bundle_file_name, CatalogClient};
use crate::config::RunContext;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::ui::{format_bytes, UserInterface};

/// File name prefix shared by every All-in-One bundle.
pub const BUNDLE_PREFIX: &str = "Visual-C-Runtimes-All-in-One-";

/// Where a bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleOrigin {
    LocalCache,
    RemoteFetch,
}

/// What happens to a bundle once the run is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    DeleteAfterUse,
    Preserve,
}

/// The archive a run installs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub path: PathBuf,
    pub origin: BundleOrigin,
    pub retention: Retention,
}

impl Bundle {
    /// File name of the bundle, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Whether `name` looks like an All-in-One bundle.
///
/// Both the prefix and the extension match case-insensitively.
pub fn is_bundle_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with(&BUNDLE_PREFIX.to_lowercase()) && lower.ends_with(".zip")
}

/// Find the newest cached bundle in `dir`.
///
/// Bundle names embed their release date, so the lexicographically last
/// matching name is the newest one.
pub fn find_local_bundle(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut newest: Option<(String, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_bundle_name(&name) {
            continue;
        }
        if newest.as_ref().is_none_or(|(best, _)| name > *best) {
            newest = Some((name, entry.path()));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

/// Obtains the latest bundle from the network.
pub trait BundleFetcher {
    /// Download the latest bundle into `dest_dir` and return its path.
    fn fetch_latest(&self, dest_dir: &Path, ui: &mut dyn UserInterface) -> Result<PathBuf>;
}

/// Catalog lookup followed by a mirror download.
pub struct RemoteSource {
    catalog: CatalogClient,
    fetcher: Fetcher,
}

impl RemoteSource {
    pub fn new(catalog: CatalogClient, fetcher: Fetcher) -> Self {
        Self { catalog, fetcher }
    }
}

impl BundleFetcher for RemoteSource {
    fn fetch_latest(&self, dest_dir: &Path, ui: &mut dyn UserInterface) -> Result<PathBuf> {
        ui.show_header("Downloading Visual C++ Runtimes");

        let package_id = self.catalog.latest_package_id()?;
        tracing::debug!("Latest package id: {}", package_id);

        let mirror = self.catalog.pick_mirror()?;
        ui.message(&format!("Using mirror {}", mirror));

        let url = self.catalog.resolve_download_url(&package_id, &mirror)?;
        tracing::debug!("Download URL: {}", url);

        let file_name = bundle_file_name(&url)?;
        ui.message(&format!("New package found: {}", file_name));

        fs::create_dir_all(dest_dir)?;
        let download = self
            .fetcher
            .download(url.as_str(), &dest_dir.join(&file_name), ui)?;

        ui.success(&format!("Download complete ({})", format_bytes(download.bytes)));
        Ok(download.path)
    }
}

/// Decide which bundle this run uses.
///
/// A cached bundle is used as is and always preserved. Otherwise the latest
/// one is fetched and kept only with `preserve_download`.
pub fn resolve_bundle(
    base_dir: &Path,
    ctx: &RunContext,
    remote: &dyn BundleFetcher,
    ui: &mut dyn UserInterface,
) -> Result<Bundle> {
    if let Some(path) = find_local_bundle(base_dir)? {
        let bundle = Bundle {
            path,
            origin: BundleOrigin::LocalCache,
            retention: Retention::Preserve,
        };
        ui.message(&format!("Using local package: {}", bundle.file_name()));
        return Ok(bundle);
    }

    if ctx.dry_run {
        ui.message("Dry-run: no local package found, downloading once to seed cache");
    }

    let path = remote.fetch_latest(base_dir, ui)?;
    let retention = if ctx.preserve_download {
        Retention::Preserve
    } else {
        Retention::DeleteAfterUse
    };

    Ok(Bundle {
        path,
        origin: BundleOrigin::RemoteFetch,
        retention,
    })
}
