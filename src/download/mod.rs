//! HTTP access for add-on lookups and archive downloads.
//!
//! # Features
//!
//! - One shared client per run (connection pooling)
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Archive bodies streamed into a buffer that spills to disk past 16 MiB
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use addon_installer::download::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let archive = client
//!     .download_archive("https://example.com/files/1/2/MyAddon-1.2.zip")
//!     .await?;
//! println!("Buffered {} bytes", archive.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;

pub use client::{ArchiveBuffer, HttpClient, buffer_archive};
pub use error::DownloadError;
