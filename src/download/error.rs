//! Error types for the download module.
//!
//! Every variant carries the URL it was raised for, so a log line alone
//! identifies which add-on request failed.

use thiserror::Error;

/// Errors that can occur while fetching an archive.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The temporary buffer holding the archive could not be written.
    #[error("IO error buffering archive from {url}: {source}")]
    Buffer {
        /// The URL whose body was being buffered.
        url: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a transport error from a reqwest error, promoting timeouts.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a buffering error.
    pub fn buffer(url: impl Into<String>, source: std::io::Error) -> Self {
        Self::Buffer {
            url: url.into(),
            source,
        }
    }

    /// The URL this error was raised for.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::HttpStatus { url, .. }
            | Self::Buffer { url, .. } => url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_timeout_display() {
        let error = DownloadError::timeout("https://example.com/addon.zip");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/addon.zip"));
    }

    #[test]
    fn test_download_error_http_status_display() {
        let error = DownloadError::http_status("https://example.com/addon.zip", 503);
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected '503' in: {msg}");
        assert!(
            msg.contains("https://example.com/addon.zip"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_download_error_buffer_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full");
        let error = DownloadError::buffer("https://example.com/addon.zip", io_error);
        let msg = error.to_string();
        assert!(msg.contains("buffering"), "Expected 'buffering' in: {msg}");
        assert!(msg.contains("disk full"), "Expected source in: {msg}");
    }

    #[test]
    fn test_download_error_url_accessor() {
        let error = DownloadError::http_status("https://example.com/a.zip", 404);
        assert_eq!(error.url(), "https://example.com/a.zip");
        let error = DownloadError::timeout("https://example.com/b.zip");
        assert_eq!(error.url(), "https://example.com/b.zip");
    }
}
