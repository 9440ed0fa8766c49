//! Concurrent fetch-and-extract orchestration.
//!
//! The [`Installer`] runs one task per configured add-on. Each task walks the
//! state machine below, writing every transition to its progress line:
//!
//! ```text
//! registered -> downloading -> not found
//!                           -> extracting -> done
//!                           -> done                 (no-op mode)
//!                           -> error                (transport/archive failure)
//! ```
//!
//! # Concurrency Model
//!
//! - All progress lines are registered up front, in configuration order
//! - Every add-on then runs in its own Tokio task; no task waits on another
//! - Extraction runs on the blocking pool so it never stalls network waits
//! - A failing or panicking task is recorded for its add-on only
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use addon_installer::display::ProgressDisplay;
//! use addon_installer::download::HttpClient;
//! use addon_installer::install::{InstallOptions, Installer};
//! use addon_installer::resolver::{ResolverSource, build_resolver};
//!
//! # async fn example() {
//! let installer = Installer::new(
//!     HttpClient::new(),
//!     build_resolver(ResolverSource::Latest, None),
//!     Arc::new(ProgressDisplay::stdout("Installing")),
//!     InstallOptions::new("/games/wow/Interface/AddOns"),
//! );
//! let report = installer
//!     .run(&["AtlasLoot".to_string(), "Bagnon".to_string()])
//!     .await;
//! println!("{} of {} installed", report.done(), report.total());
//! # }
//! ```

mod error;
mod outcome;

pub use error::FetchError;
pub use outcome::{FetchResult, FetchStatus, ItemStatus, RunReport};

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::display::ProgressDisplay;
use crate::download::HttpClient;
use crate::extract::extract_archive;
use crate::resolver::{ArchiveInfo, Resolver};

/// Where and how archives are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Directory archives are extracted into.
    pub addons_path: PathBuf,
    /// Fetch archives but skip extraction.
    pub noop: bool,
}

impl InstallOptions {
    /// Creates options extracting into `addons_path`.
    #[must_use]
    pub fn new(addons_path: impl Into<PathBuf>) -> Self {
        Self {
            addons_path: addons_path.into(),
            noop: false,
        }
    }

    /// Sets no-op (verification only) mode.
    #[must_use]
    pub fn with_noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }
}

/// Drives one fetch-and-extract operation per add-on.
pub struct Installer<W: Write + Send + 'static> {
    client: HttpClient,
    resolver: Arc<dyn Resolver>,
    display: Arc<ProgressDisplay<W>>,
    options: Arc<InstallOptions>,
}

impl<W: Write + Send + 'static> std::fmt::Debug for Installer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("resolver", &self.resolver.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// Manual impl: deriving would demand `W: Clone`.
impl<W: Write + Send + 'static> Clone for Installer<W> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            resolver: Arc::clone(&self.resolver),
            display: Arc::clone(&self.display),
            options: Arc::clone(&self.options),
        }
    }
}

impl<W: Write + Send + 'static> Installer<W> {
    /// Creates an installer reporting progress on `display`.
    #[must_use]
    pub fn new(
        client: HttpClient,
        resolver: Arc<dyn Resolver>,
        display: Arc<ProgressDisplay<W>>,
        options: InstallOptions,
    ) -> Self {
        Self {
            client,
            resolver,
            display,
            options: Arc::new(options),
        }
    }

    /// The progress display this installer writes to.
    #[must_use]
    pub fn display(&self) -> &Arc<ProgressDisplay<W>> {
        &self.display
    }

    /// The installer's options.
    #[must_use]
    pub fn options(&self) -> &InstallOptions {
        &self.options
    }

    /// Installs every add-on concurrently and waits for all of them.
    ///
    /// Never fails as a whole: each add-on's outcome, including failures, is
    /// in the returned report, in the order of `addons`.
    #[instrument(skip_all, fields(addons = addons.len(), resolver = self.resolver.name(), noop = self.options.noop))]
    pub async fn run(&self, addons: &[String]) -> RunReport {
        info!("starting install run");

        let mut registered = Vec::with_capacity(addons.len());
        for addon in addons {
            match self.display.register(addon) {
                Ok(line) => {
                    debug!(addon = %addon, position = line.position(), "progress line registered");
                    registered.push((addon.clone(), Ok(())));
                }
                Err(e) => {
                    error!(addon = %addon, error = %e, "cannot track add-on; skipping");
                    registered.push((addon.clone(), Err(e.to_string())));
                }
            }
        }

        let mut handles = Vec::with_capacity(registered.len());
        for (addon, tracked) in registered {
            let handle = tracked.map(|()| {
                let installer = self.clone();
                let task_addon = addon.clone();
                tokio::spawn(async move { installer.install_addon(task_addon).await })
            });
            handles.push((addon, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (addon, handle) in handles {
            let result = match handle {
                Ok(handle) => match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(addon = %addon, error = %e, "add-on task panicked");
                        self.finish_line(&addon, ItemStatus::Error);
                        FetchResult::error(&addon, format!("task failed: {e}"))
                    }
                },
                Err(reason) => FetchResult::error(&addon, reason),
            };
            results.push(result);
        }

        let report = RunReport::new(results);
        info!(
            done = report.done(),
            not_found = report.not_found(),
            failed = report.failed(),
            total = report.total(),
            "install run complete"
        );
        report
    }

    /// Runs one add-on to its terminal state.
    async fn install_addon(&self, addon: String) -> FetchResult {
        match self.fetch_and_extract(&addon).await {
            Ok(info) => {
                self.finish_line(&addon, ItemStatus::Done);
                info!(
                    addon = %addon,
                    version = info.version.as_deref().unwrap_or("unknown"),
                    noop = self.options.noop,
                    "add-on installed"
                );
                FetchResult::done(addon, info)
            }
            Err(e) if e.is_not_found() => {
                self.finish_line(&addon, ItemStatus::NotFound);
                error!(addon = %addon, error = %e, "add-on not found");
                FetchResult::not_found(addon, e.to_string())
            }
            Err(e) => {
                self.finish_line(&addon, ItemStatus::Error);
                error!(addon = %addon, error = %e, "add-on failed");
                FetchResult::error(addon, e.to_string())
            }
        }
    }

    #[instrument(skip(self), fields(resolver = self.resolver.name()))]
    async fn fetch_and_extract(&self, addon: &str) -> Result<ArchiveInfo, FetchError> {
        self.display.update(addon, ItemStatus::Downloading)?;

        let resolved = self.resolver.resolve(&self.client, addon).await?;
        info!(addon = %addon, url = %resolved.info.url, "downloading");
        let archive = resolved.source.fetch(&self.client).await?;
        debug!(addon = %addon, bytes = archive.len(), "archive fetched");

        if self.options.noop {
            debug!(addon = %addon, "no-op mode; skipping extraction");
            return Ok(resolved.info);
        }

        self.display.update(addon, ItemStatus::Extracting)?;
        let summary = extract_archive(archive, &self.options.addons_path).await?;
        info!(
            addon = %addon,
            path = %self.options.addons_path.display(),
            files = summary.files,
            "extracted"
        );
        Ok(resolved.info)
    }

    /// Writes a terminal status; the outcome is already decided, so a failed
    /// write is only logged.
    fn finish_line(&self, addon: &str, status: ItemStatus) {
        if let Err(e) = self.display.update(addon, status) {
            warn!(addon = %addon, status = %status, error = %e, "failed to update progress line");
        }
    }
}
