//! "Latest file" endpoint resolver.
//!
//! `GET <base>/<addon>/files/latest` answers with the newest archive directly
//! (usually after a redirect to the CDN). A success status means the response
//! body is the archive, so resolution and download share one request.

use async_trait::async_trait;
use tracing::debug;

use super::{
    ArchiveInfo, ArchiveSource, ResolveError, ResolvedArchive, Resolver, lookup_url,
};
use crate::download::HttpClient;

/// Default project root of the "latest file" endpoint.
pub const DEFAULT_LATEST_BASE_URL: &str = "https://wow.curseforge.com/projects";

/// Resolves add-ons through the "latest file" endpoint.
#[derive(Debug, Clone)]
pub struct LatestFileResolver {
    base_url: String,
}

impl LatestFileResolver {
    /// Creates a resolver rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for LatestFileResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LATEST_BASE_URL)
    }
}

#[async_trait]
impl Resolver for LatestFileResolver {
    fn name(&self) -> &str {
        "latest"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(skip(self, client), fields(resolver = "latest"))]
    async fn resolve(
        &self,
        client: &HttpClient,
        addon: &str,
    ) -> Result<ResolvedArchive, ResolveError> {
        let url = lookup_url(&self.base_url, addon, "files/latest");
        let response = client.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::status(addon, &url, status.as_u16()));
        }

        let info = ArchiveInfo::from_url(response.url());
        debug!(final_url = %info.url, version = ?info.version, "resolved latest file");
        Ok(ResolvedArchive {
            info,
            source: ArchiveSource::Response(response),
        })
    }
}
