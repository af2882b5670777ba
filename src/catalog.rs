//! Remote catalog resolution.
//!
//! The catalog page embeds the id of the latest package. Posting that id
//! together with a mirror id answers with a redirect whose `Location` is the
//! real download URL.

use std::sync::LazyLock;

use rand::seq::IndexedRandom;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::Url;

use crate::config::Settings;
use crate::error::{Result, VcredistError};

/// Catalog page of the All-in-One package.
pub const DEFAULT_CATALOG_URL: &str =
    "https://www.techpowerup.com/download/visual-c-redistributable-runtime-package-all-in-one/";

/// Mirror identifiers accepted by the catalog.
pub const DEFAULT_MIRRORS: [&str; 9] = ["16", "24", "26", "11", "12", "21", "19", "3", "20"];

/// Patterns locating the package id in the catalog page, tried in order.
static PACKAGE_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r#"name="id"\s+value="(\d+)""#,
        r"download_id\s*=\s*(\d+)",
        r#""id"\s*:\s*"(\d+)""#,
    ]
    .map(|pattern| Regex::new(pattern).expect("PACKAGE_ID_PATTERNS must compile"))
});

/// Chooses one mirror from the pool.
pub type MirrorSelector = Box<dyn Fn(&[String]) -> Option<String>>;

/// Pick a mirror uniformly at random.
pub fn random_mirror(mirrors: &[String]) -> Option<String> {
    mirrors.choose(&mut rand::rng()).cloned()
}

/// Extract the package id from a catalog page body.
///
/// Returns the capture of the first pattern that matches.
pub fn extract_package_id(body: &str) -> Option<String> {
    PACKAGE_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(body).map(|caps| caps[1].to_string()))
}

/// Derive the bundle file name from the download URL's last path segment.
pub fn bundle_file_name(url: &Url) -> Result<String> {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        return Err(VcredistError::InvalidDownloadUrl {
            url: url.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Client for the catalog page and the mirror redirect.
pub struct CatalogClient {
    client: Client,
    catalog_url: String,
    mirrors: Vec<String>,
    select_mirror: MirrorSelector,
}

impl CatalogClient {
    /// Create a client for the catalog configured in `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vcredist/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.metadata_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| VcredistError::Other(e.into()))?;

        Ok(Self {
            client,
            catalog_url: settings.catalog_url.clone(),
            mirrors: settings.mirrors.clone(),
            select_mirror: Box::new(random_mirror),
        })
    }

    /// Replace the mirror selector.
    pub fn with_selector(mut self, selector: MirrorSelector) -> Self {
        self.select_mirror = selector;
        self
    }

    /// Choose the mirror for this run.
    pub fn pick_mirror(&self) -> Result<String> {
        (self.select_mirror)(&self.mirrors).ok_or(VcredistError::NoMirrors)
    }

    /// Fetch the catalog page and extract the latest package id.
    pub fn latest_package_id(&self) -> Result<String> {
        let catalog_error = |message: String| VcredistError::CatalogUnreachable {
            url: self.catalog_url.clone(),
            message,
        };

        let response = self
            .client
            .get(&self.catalog_url)
            .send()
            .map_err(|e| catalog_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(catalog_error(format!("HTTP {}", response.status())));
        }

        let body = response.text().map_err(|e| catalog_error(e.to_string()))?;
        tracing::debug!("Catalog page is {} bytes", body.len());

        extract_package_id(&body).ok_or_else(|| VcredistError::CatalogFormatChanged {
            url: self.catalog_url.clone(),
        })
    }

    /// Ask the catalog for the download URL of `package_id` on `mirror`.
    pub fn resolve_download_url(&self, package_id: &str, mirror: &str) -> Result<Url> {
        let response = self
            .client
            .post(&self.catalog_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!("id={}&server_id={}", package_id, mirror))
            .send()
            .map_err(|e| VcredistError::CatalogUnreachable {
                url: self.catalog_url.clone(),
                message: e.to_string(),
            })?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| VcredistError::MissingRedirect {
                package_id: package_id.to_string(),
                status: response.status().as_u16(),
            })?;

        // Relative redirects resolve against the catalog page.
        Url::parse(&self.catalog_url)
            .and_then(|base| base.join(location))
            .map_err(|_| VcredistError::InvalidDownloadUrl {
                url: location.to_string(),
            })
    }
}
