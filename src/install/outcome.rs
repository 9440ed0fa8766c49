//! Per-item progress states and run results.

use std::fmt;

use crate::resolver::ArchiveInfo;

/// Status text written to an add-on's progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Resolving and fetching the archive.
    Downloading,
    /// Unpacking into the add-ons directory.
    Extracting,
    /// Finished successfully.
    Done,
    /// The hosting service has no archive for the add-on.
    NotFound,
    /// Ended by a transport, archive or display failure.
    Error,
}

impl ItemStatus {
    /// Text shown on the progress line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Downloading => "downloading",
            Self::Extracting => "extracting",
            Self::Done => "done",
            Self::NotFound => "not found",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Fetched (and extracted unless in no-op mode).
    Done,
    /// Lookup missed.
    NotFound,
    /// Failed after or during the lookup.
    Error,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Done => "done",
            Self::NotFound => "not-found",
            Self::Error => "error",
        };
        f.write_str(tag)
    }
}

/// Result of one add-on's operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The add-on identifier.
    pub addon: String,
    /// Terminal status.
    pub status: FetchStatus,
    /// Resolved version label, when known.
    pub version: Option<String>,
    /// Resolved archive file name, when known.
    pub file_name: Option<String>,
    /// Failure description for `Error` and `NotFound` outcomes.
    pub error: Option<String>,
}

impl FetchResult {
    pub(crate) fn done(addon: impl Into<String>, info: ArchiveInfo) -> Self {
        Self {
            addon: addon.into(),
            status: FetchStatus::Done,
            version: info.version,
            file_name: info.file_name,
            error: None,
        }
    }

    pub(crate) fn not_found(addon: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            addon: addon.into(),
            status: FetchStatus::NotFound,
            version: None,
            file_name: None,
            error: Some(reason.into()),
        }
    }

    pub(crate) fn error(addon: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            addon: addon.into(),
            status: FetchStatus::Error,
            version: None,
            file_name: None,
            error: Some(message.into()),
        }
    }
}

/// All item results of a run, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    results: Vec<FetchResult>,
}

impl RunReport {
    pub(crate) fn new(results: Vec<FetchResult>) -> Self {
        Self { results }
    }

    /// Item results in configuration order.
    #[must_use]
    pub fn results(&self) -> &[FetchResult] {
        &self.results
    }

    /// Looks up the result for `addon`.
    #[must_use]
    pub fn get(&self, addon: &str) -> Option<&FetchResult> {
        self.results.iter().find(|result| result.addon == addon)
    }

    /// Number of add-ons that reached `done`.
    #[must_use]
    pub fn done(&self) -> usize {
        self.count(FetchStatus::Done)
    }

    /// Number of add-ons the service did not know.
    #[must_use]
    pub fn not_found(&self) -> usize {
        self.count(FetchStatus::NotFound)
    }

    /// Number of add-ons that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(FetchStatus::Error)
    }

    /// Total number of add-ons processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    fn count(&self, status: FetchStatus) -> usize {
        self.results
            .iter()
            .filter(|result| result.status == status)
            .count()
    }
}
