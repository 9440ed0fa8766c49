//! Error types for add-on resolution.

use thiserror::Error;

use crate::download::DownloadError;

/// Errors that can occur while locating an add-on's archive.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The hosting service has no archive for this add-on.
    ///
    /// Raised for non-success lookup responses and for lookup pages without a
    /// download link. This is a per-add-on outcome, not a run failure.
    #[error("add-on '{addon}' not found: {reason}")]
    NotFound {
        /// The add-on identifier that was looked up.
        addon: String,
        /// Why the lookup missed.
        reason: String,
    },

    /// The lookup request itself failed.
    #[error("lookup failed: {0}")]
    Transport(#[from] DownloadError),
}

impl ResolveError {
    /// Creates a `NotFound` error for a non-success lookup response.
    #[must_use]
    pub fn status(addon: &str, url: &str, status: u16) -> Self {
        Self::NotFound {
            addon: addon.to_string(),
            reason: format!("HTTP {status} from {url}"),
        }
    }

    /// Creates a `NotFound` error for a lookup page without a download link.
    #[must_use]
    pub fn no_link(addon: &str, url: &str) -> Self {
        Self::NotFound {
            addon: addon.to_string(),
            reason: format!("no download link on {url}"),
        }
    }

    /// Returns true if this is a lookup miss rather than a transport failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
