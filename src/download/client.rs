//! HTTP client wrapper for lookup and archive requests.
//!
//! This module provides the `HttpClient` struct, shared by every add-on task
//! of a run, and [`ArchiveBuffer`], the spillable buffer archive bodies are
//! streamed into.

use std::io::{self, Seek, SeekFrom, Write};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Response};
use tempfile::SpooledTempFile;
use tracing::{debug, instrument};

use super::constants::{CONNECT_TIMEOUT_SECS, MAX_IN_MEMORY_ARCHIVE_BYTES, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for add-on lookups and archive downloads.
///
/// Created once per run and cloned into each task; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Sends a GET request and returns the response whatever its status.
    ///
    /// Callers that treat a non-success status as a lookup miss rather than a
    /// failure use this; everyone else wants [`get_success`](Self::get_success).
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] or [`DownloadError::Timeout`] when the
    /// request cannot be completed.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, DownloadError> {
        debug!("sending request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::transport(url, e))?;
        debug!(status = response.status().as_u16(), "received response");
        Ok(response)
    }

    /// Sends a GET request and fails on any non-success status.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::HttpStatus`] for 4xx/5xx responses, plus the
    /// transport errors of [`get`](Self::get).
    pub async fn get_success(&self, url: &str) -> Result<Response, DownloadError> {
        let response = self.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }

    /// Downloads `url` into a fresh [`ArchiveBuffer`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`get_success`](Self::get_success) and
    /// [`buffer_archive`].
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download_archive(&self, url: &str) -> Result<ArchiveBuffer, DownloadError> {
        let response = self.get_success(url).await?;
        buffer_archive(response).await
    }
}

/// Streams a response body into a new [`ArchiveBuffer`].
///
/// # Errors
///
/// Returns [`DownloadError::Network`]/[`DownloadError::Timeout`] if the body
/// stream breaks, or [`DownloadError::Buffer`] if the spilled buffer cannot
/// be written.
pub async fn buffer_archive(response: Response) -> Result<ArchiveBuffer, DownloadError> {
    let url = response.url().to_string();
    let mut buffer = ArchiveBuffer::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::transport(url.as_str(), e))?;
        buffer
            .write_chunk(&chunk)
            .map_err(|e| DownloadError::buffer(url.as_str(), e))?;
    }

    debug!(
        url = %url,
        bytes = buffer.len(),
        spilled = buffer.is_spilled(),
        "archive buffered"
    );
    Ok(buffer)
}

/// Archive bytes held in memory, spilling to an anonymous temporary file once
/// they outgrow the in-memory limit.
#[derive(Debug)]
pub struct ArchiveBuffer {
    file: SpooledTempFile,
    len: u64,
}

impl Default for ArchiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuffer {
    /// Creates an empty buffer with the default in-memory limit (16 MiB).
    #[must_use]
    pub fn new() -> Self {
        Self::with_memory_limit(MAX_IN_MEMORY_ARCHIVE_BYTES)
    }

    /// Creates an empty buffer that spills after `max_in_memory` bytes.
    #[must_use]
    pub fn with_memory_limit(max_in_memory: usize) -> Self {
        Self {
            file: SpooledTempFile::new(max_in_memory),
            len: 0,
        }
    }

    /// Creates a buffer holding `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the bytes cannot be written.
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let mut buffer = Self::new();
        buffer.write_chunk(bytes)?;
        Ok(buffer)
    }

    /// Appends a chunk of archive bytes.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the spilled temporary file cannot be written.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk)?;
        self.len += chunk.len() as u64;
        Ok(())
    }

    /// Number of bytes buffered.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if nothing was buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true once the buffer has moved to a temporary file.
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        self.file.is_rolled()
    }

    /// Rewinds the buffer and returns it as a seekable reader.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the rewind fails.
    pub fn into_reader(mut self) -> io::Result<SpooledTempFile> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(self.file)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::io::Read;

    #[test]
    fn test_archive_buffer_round_trips_bytes() {
        let mut buffer = ArchiveBuffer::new();
        buffer.write_chunk(b"PK\x03\x04").unwrap();
        buffer.write_chunk(b"rest").unwrap();
        assert_eq!(buffer.len(), 8);
        assert!(!buffer.is_spilled());

        let mut reader = buffer.into_reader().unwrap();
        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"PK\x03\x04rest");
    }

    #[test]
    fn test_archive_buffer_spills_past_memory_limit() {
        let mut buffer = ArchiveBuffer::with_memory_limit(4);
        buffer.write_chunk(b"abc").unwrap();
        assert!(!buffer.is_spilled());
        buffer.write_chunk(b"defgh").unwrap();
        assert!(buffer.is_spilled(), "buffer should roll over to a file");

        let mut reader = buffer.into_reader().unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "abcdefgh");
    }

    #[test]
    fn test_archive_buffer_empty() {
        let buffer = ArchiveBuffer::default();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }
}
