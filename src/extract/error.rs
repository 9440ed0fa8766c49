//! Error types for archive extraction.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while unpacking an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes are not a readable zip container.
    #[error("unreadable archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A directory or file under the target could not be written.
    #[error("IO error extracting to {path}: {source}")]
    Io {
        /// Path being created or written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ExtractError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Classifies a failure while copying an entry's bytes.
    ///
    /// Decompression errors surface from the zip reader as
    /// `InvalidData`/`UnexpectedEof`; those are archive corruption, not disk
    /// trouble.
    pub fn entry(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof => {
                Self::Archive(zip::result::ZipError::Io(source))
            }
            _ => Self::io(path, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let msg = ExtractError::io("/tmp/addons/Bagnon", io_error).to_string();
        assert!(msg.contains("/tmp/addons/Bagnon"), "Expected path in: {msg}");
        assert!(msg.contains("denied"), "Expected source in: {msg}");
    }

    #[test]
    fn test_extract_error_entry_classifies_corruption() {
        let corrupt = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad deflate");
        assert!(matches!(
            ExtractError::entry("/tmp/x", corrupt),
            ExtractError::Archive(_)
        ));

        let disk = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            ExtractError::entry("/tmp/x", disk),
            ExtractError::Io { .. }
        ));
    }
}
