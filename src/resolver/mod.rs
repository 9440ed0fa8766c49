//! Add-on resolution: from an identifier to an archive source.
//!
//! # Architecture
//!
//! - [`Resolver`] - Async trait every resolution strategy implements
//! - [`LatestFileResolver`] - Canonical strategy: the service's "latest file"
//!   endpoint, whose response body is the archive itself
//! - [`LookupPageResolver`] - Legacy strategy: a download page scanned for a
//!   `/files/<n>/<n>/<name>.zip` link
//! - [`ResolverSource`] - Configuration switch between the two
//!
//! # Example
//!
//! ```no_run
//! use addon_installer::download::HttpClient;
//! use addon_installer::resolver::{ResolverSource, build_resolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = build_resolver(ResolverSource::Latest, None);
//! let client = HttpClient::new();
//! let resolved = resolver.resolve(&client, "AtlasLoot").await?;
//! println!("Resolved URL: {}", resolved.info.url);
//! # Ok(())
//! # }
//! ```

mod error;
mod latest;
mod lookup_page;

pub use error::ResolveError;
pub use latest::{DEFAULT_LATEST_BASE_URL, LatestFileResolver};
pub use lookup_page::{DEFAULT_LOOKUP_BASE_URL, LookupPageResolver, find_download_link};

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use url::Url;

use crate::download::{ArchiveBuffer, DownloadError, HttpClient, buffer_archive};

/// Which resolution strategy a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverSource {
    /// Direct "latest file" endpoint.
    #[default]
    Latest,
    /// Download page scanned for an archive link.
    LookupPage,
}

/// Builds the resolver for `source`, optionally overriding its base URL.
#[must_use]
pub fn build_resolver(source: ResolverSource, base_url: Option<&str>) -> Arc<dyn Resolver> {
    match source {
        ResolverSource::Latest => Arc::new(LatestFileResolver::new(
            base_url.unwrap_or(DEFAULT_LATEST_BASE_URL),
        )),
        ResolverSource::LookupPage => Arc::new(LookupPageResolver::new(
            base_url.unwrap_or(DEFAULT_LOOKUP_BASE_URL),
        )),
    }
}

/// Where the archive was found and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInfo {
    /// URL the archive is (or was) downloaded from.
    pub url: String,
    /// Version label, when the service exposes one.
    pub version: Option<String>,
    /// Archive file name, when known.
    pub file_name: Option<String>,
}

impl ArchiveInfo {
    /// Derives file name and version from the last path segment of `url`.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let file_name = archive_name_from_url(url);
        let version = file_name.as_deref().map(version_from_file_name);
        Self {
            url: url.to_string(),
            version,
            file_name,
        }
    }
}

/// How to obtain the archive bytes after resolution.
#[derive(Debug)]
pub enum ArchiveSource {
    /// The lookup response is the archive; its body has not been read yet.
    Response(Response),
    /// The archive still has to be requested from this URL.
    Url(String),
}

impl ArchiveSource {
    /// Reads the archive into a buffer, issuing the request if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if the request or the body stream fails.
    pub async fn fetch(self, client: &HttpClient) -> Result<ArchiveBuffer, DownloadError> {
        match self {
            Self::Response(response) => buffer_archive(response).await,
            Self::Url(url) => client.download_archive(&url).await,
        }
    }
}

/// A located archive.
#[derive(Debug)]
pub struct ResolvedArchive {
    /// Display/log metadata.
    pub info: ArchiveInfo,
    /// Pending body or URL to fetch.
    pub source: ArchiveSource,
}

/// Trait that all resolution strategies implement.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn Resolver>` shared across add-on tasks.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the strategy name (e.g., "latest", "lookup-page").
    fn name(&self) -> &str;

    /// Base URL lookups are built from.
    fn base_url(&self) -> &str;

    /// Locates the archive for `addon`.
    ///
    /// A lookup miss is [`ResolveError::NotFound`]; transport failures are
    /// [`ResolveError::Transport`].
    async fn resolve(&self, client: &HttpClient, addon: &str)
    -> Result<ResolvedArchive, ResolveError>;
}

/// Joins `base`, the percent-encoded `addon` and `suffix` into a lookup URL.
pub(crate) fn lookup_url(base: &str, addon: &str, suffix: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(addon),
        suffix
    )
}

/// Returns the decoded last path segment of `url`, if any.
pub(crate) fn archive_name_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |s| s.into_owned());
    Some(decoded)
}

/// Strips a trailing `.zip` (any case) from an archive file name.
pub(crate) fn version_from_file_name(file_name: &str) -> String {
    let cut = file_name.len().saturating_sub(4);
    match file_name.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".zip") => file_name[..cut].to_string(),
        _ => file_name.to_string(),
    }
}
