//! Error type for a single add-on operation.

use thiserror::Error;

use crate::display::DisplayError;
use crate::download::DownloadError;
use crate::extract::ExtractError;
use crate::resolver::ResolveError;

/// Why an add-on's operation stopped before `done`.
///
/// These never abort a run; the orchestrator logs them and records the
/// outcome for that add-on only.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Lookup missed or the lookup request failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The archive body could not be fetched.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The archive could not be unpacked.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The progress line could not be updated.
    #[error(transparent)]
    Display(#[from] DisplayError),
}

impl FetchError {
    /// Returns true for lookup misses, which end at `not found` rather than `error`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Resolve(error) if error.is_not_found())
    }
}
