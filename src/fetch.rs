//! Bundle transfer.
//!
//! Streams the bundle to `<name>.part` and renames it once complete, so an
//! interrupted transfer never looks like a cached bundle to a later run.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use crate::config::Settings;
use crate::error::{Result, VcredistError};
use crate::ui::UserInterface;

const CHUNK_SIZE: usize = 16 * 1024;

/// A completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Final location of the file.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
    /// Hex SHA-256 digest of the content.
    pub sha256: String,
}

/// Downloads bundles over HTTP/HTTPS.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with the transfer timeouts from `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_timeouts(settings.connect_timeout, settings.download_timeout)
    }

    /// Create a fetcher with explicit timeouts.
    ///
    /// `timeout` bounds each read of the response body, not the whole transfer.
    pub fn with_timeouts(connect_timeout: Duration, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vcredist/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| VcredistError::Other(e.into()))?;

        Ok(Self { client })
    }

    /// Stream `url` to `dest`, reporting progress through `ui`.
    pub fn download(&self, url: &str, dest: &Path, ui: &mut dyn UserInterface) -> Result<Download> {
        let failed = |message: String| VcredistError::DownloadFailed {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let total = response.content_length().filter(|len| *len > 0);
        let partial = partial_path(dest);
        let label = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let streamed = stream_to(&mut response, &partial, total, &label, ui)
            .map_err(|e| match e {
                StreamError::Read(e) => failed(e.to_string()),
                StreamError::Write(e) => VcredistError::Io(e),
            })
            .and_then(|(bytes, digest)| match total {
                Some(expected) if bytes != expected => Err(failed(format!(
                    "transfer ended after {} of {} bytes",
                    bytes, expected
                ))),
                _ => Ok((bytes, digest)),
            });

        let (bytes, sha256) = match streamed {
            Ok(done) => done,
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&partial) {
                    tracing::debug!(
                        "Could not remove partial file {}: {}",
                        partial.display(),
                        remove_err
                    );
                }
                return Err(e);
            }
        };

        fs::rename(&partial, dest)?;
        tracing::debug!("Downloaded {} ({} bytes, sha256 {})", dest.display(), bytes, sha256);

        Ok(Download {
            path: dest.to_path_buf(),
            bytes,
            sha256,
        })
    }
}

/// Path used while a transfer is in flight.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

enum StreamError {
    Read(std::io::Error),
    Write(std::io::Error),
}

fn stream_to(
    source: &mut impl Read,
    path: &Path,
    total: Option<u64>,
    label: &str,
    ui: &mut dyn UserInterface,
) -> std::result::Result<(u64, String), StreamError> {
    let file = File::create(path).map_err(StreamError::Write)?;
    let mut writer = BufWriter::new(file);
    let mut hasher = Sha256::new();
    let mut progress = ui.start_download(label, total);
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut bytes = 0u64;

    let result = loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(StreamError::Read(e)),
        };
        if let Err(e) = writer.write_all(&buf[..n]) {
            break Err(StreamError::Write(e));
        }
        hasher.update(&buf[..n]);
        bytes += n as u64;
        progress.advance(n as u64);
    };
    progress.finish();
    result?;

    writer.flush().map_err(StreamError::Write)?;
    Ok((bytes, hex::encode(hasher.finalize())))
}
