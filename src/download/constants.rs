//! Constants for the download module (timeouts, buffering).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large archives).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Archive bytes kept in memory before the buffer spills to a temporary file (16 MiB).
pub const MAX_IN_MEMORY_ARCHIVE_BYTES: usize = 16 * 1024 * 1024;
