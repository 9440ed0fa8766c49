//! Error types for the progress display.

use thiserror::Error;

/// Errors returned by [`ProgressDisplay`](super::ProgressDisplay) operations.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// `register` was called twice with the same label.
    #[error("label '{label}' is already registered on the progress display")]
    DuplicateLabel {
        /// The label that was registered a second time.
        label: String,
    },

    /// `update` referenced a label that was never registered.
    ///
    /// This is a caller bug: every label must be registered before it is updated.
    #[error("label '{label}' was never registered on the progress display")]
    UnknownLabel {
        /// The unregistered label.
        label: String,
    },

    /// Writing to or flushing the output stream failed.
    #[error("failed to write progress output: {0}")]
    Io(#[from] std::io::Error),
}

impl DisplayError {
    /// Creates a duplicate-label error.
    pub fn duplicate_label(label: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
        }
    }

    /// Creates an unknown-label error.
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            label: label.into(),
        }
    }
}
