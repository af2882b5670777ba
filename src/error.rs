//! Error types for vcredist operations.
//!
//! This module defines [`VcredistError`], the error type for every fatal
//! condition of a run, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Only fatal conditions are errors: package resolution and acquisition
//!   failures, unreadable archives, and an expansion without installers
//! - Per-installer failures and cleanup problems are not errors; they are
//!   recorded as outcomes and reported through the UI
//! - Use `anyhow::Error` (via `VcredistError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for vcredist operations.
#[derive(Debug, Error)]
pub enum VcredistError {
    /// The catalog page could not be fetched.
    #[error("Catalog unreachable at {url}: {message}")]
    CatalogUnreachable { url: String, message: String },

    /// The catalog page was fetched but no package id could be found in it.
    #[error("Unable to locate the latest package id at {url} (catalog format changed or unreachable)")]
    CatalogFormatChanged { url: String },

    /// The mirror request did not answer with a redirect.
    #[error("Catalog did not return a redirect for package {package_id} (HTTP {status})")]
    MissingRedirect { package_id: String, status: u16 },

    /// The redirect target is not a usable download URL.
    #[error("Invalid download URL: {url}")]
    InvalidDownloadUrl { url: String },

    /// The mirror pool is empty.
    #[error("No download mirrors configured")]
    NoMirrors,

    /// The bundle transfer failed.
    #[error("Download of {url} failed: {message}")]
    DownloadFailed { url: String, message: String },

    /// The bundle archive could not be opened or decompressed.
    #[error("Failed to read archive {path}: {message}")]
    ArchiveUnreadable { path: PathBuf, message: String },

    /// The expansion contains no installer binaries.
    #[error("No redistributable installers found in {path}")]
    NoInstallers { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for vcredist operations.
pub type Result<T> = std::result::Result<T, VcredistError>;
