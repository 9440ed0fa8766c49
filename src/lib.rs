//! Add-on Installer Library
//!
//! Concurrently fetches add-on archives from a hosting service and unpacks
//! them into a local directory, keeping one in-place progress line per add-on.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`display`] - Ordered, in-place multi-line terminal progress
//! - [`resolver`] - Add-on identifier to archive source
//! - [`download`] - Shared HTTP client and spillable archive buffers
//! - [`extract`] - Zip extraction into the add-ons directory
//! - [`install`] - Concurrent per-add-on orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod display;
pub mod download;
pub mod extract;
pub mod install;
pub mod resolver;
mod user_agent;

// Re-export commonly used types
pub use display::{DisplayError, LineHandle, ProgressDisplay};
pub use download::{ArchiveBuffer, DownloadError, HttpClient};
pub use extract::{ExtractError, ExtractSummary, extract_archive};
pub use install::{
    FetchError, FetchResult, FetchStatus, InstallOptions, Installer, ItemStatus, RunReport,
};
pub use resolver::{
    LatestFileResolver, LookupPageResolver, ResolveError, ResolvedArchive, Resolver,
    ResolverSource, build_resolver,
};
