//! Download-page resolver.
//!
//! Older hosting front ends serve an HTML page per add-on that embeds the CDN
//! link of the current archive. The page is not parsed; its text is scanned
//! for the first match of [`DOWNLOAD_LINK_PATTERN`].

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::{
    ArchiveInfo, ArchiveSource, ResolveError, ResolvedArchive, Resolver, archive_name_from_url,
    lookup_url,
};
use crate::download::{DownloadError, HttpClient};

/// Default root of the per-add-on download pages.
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://mods.curse.com/addons/wow";

/// Download link contract: `http(s)://<host>[:port]/files/<digits>/<digits>/<name>.zip`,
/// matched case-insensitively. `url` is the whole link, `version` is `<name>`.
const DOWNLOAD_LINK_PATTERN: &str =
    r#"(?i)(?P<url>https?://[a-z0-9.\-]+(?::\d+)?/files/\d+/\d+/(?P<version>[^/\s"'<>]+?)\.zip)"#;

#[allow(clippy::expect_used)]
static DOWNLOAD_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DOWNLOAD_LINK_PATTERN).expect("download link regex is valid") // Static pattern, safe to panic
});

/// Finds the first archive link in `body`, returning `(url, version)`.
#[must_use]
pub fn find_download_link(body: &str) -> Option<(String, String)> {
    let captures = DOWNLOAD_LINK.captures(body)?;
    let url = captures.name("url")?.as_str().to_string();
    let version = captures.name("version")?.as_str().to_string();
    Some((url, version))
}

/// Resolves add-ons by scanning their download page.
#[derive(Debug, Clone)]
pub struct LookupPageResolver {
    base_url: String,
}

impl LookupPageResolver {
    /// Creates a resolver rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for LookupPageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_BASE_URL)
    }
}

#[async_trait]
impl Resolver for LookupPageResolver {
    fn name(&self) -> &str {
        "lookup-page"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(skip(self, client), fields(resolver = "lookup-page"))]
    async fn resolve(
        &self,
        client: &HttpClient,
        addon: &str,
    ) -> Result<ResolvedArchive, ResolveError> {
        let page_url = lookup_url(&self.base_url, addon, "download");
        let response = client.get(&page_url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::status(addon, &page_url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::transport(page_url.as_str(), e))?;
        let (url, version) =
            find_download_link(&body).ok_or_else(|| ResolveError::no_link(addon, &page_url))?;
        debug!(download_url = %url, version = %version, "found download link");

        let file_name = Url::parse(&url)
            .ok()
            .and_then(|parsed| archive_name_from_url(&parsed));
        Ok(ResolvedArchive {
            info: ArchiveInfo {
                url: url.clone(),
                version: Some(version),
                file_name,
            },
            source: ArchiveSource::Url(url),
        })
    }
}
