//! In-place multi-line progress output for concurrent operations.
//!
//! Each registered label owns one terminal line, fixed at registration time.
//! Updates jump the cursor up to that line with ANSI escape sequences, rewrite
//! it, and jump back down, so lines for other labels are never touched.
//!
//! # Layout
//!
//! ```text
//! Installing AtlasLoot ... done
//! Installing Bagnon ... extracting
//! Installing DoesNotExist123 ... not found
//! _  <- cursor rests here, one line below the last registered line
//! ```
//!
//! # Concurrency
//!
//! The label list and the output stream sit behind a single mutex. A
//! `register` or `update` call holds it for its whole byte sequence, so calls
//! from concurrent tasks never interleave their escape codes.

mod error;

pub use error::DisplayError;

use std::fmt;
use std::io::{self, Stdout, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

/// ASCII escape, the start of every control sequence written here.
const ESC: char = '\x1b';

/// Handle to a registered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHandle {
    label: String,
    position: usize,
}

impl LineHandle {
    /// The registered label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Zero-based line index in registration order.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

#[derive(Debug)]
struct DisplayState<W> {
    labels: Vec<String>,
    out: W,
}

/// Ordered set of terminal lines that can be rewritten in place.
///
/// Writes go to the stream handed to [`ProgressDisplay::new`]; production code
/// uses [`ProgressDisplay::stdout`].
#[derive(Debug)]
pub struct ProgressDisplay<W: Write> {
    prefix: String,
    state: Mutex<DisplayState<W>>,
}

impl ProgressDisplay<Stdout> {
    /// Creates a display writing to the process's standard output.
    #[must_use]
    pub fn stdout(prefix: impl Into<String>) -> Self {
        Self::new(prefix, io::stdout())
    }
}

impl<W: Write> ProgressDisplay<W> {
    /// Creates a display with the given line prefix writing to `out`.
    #[must_use]
    pub fn new(prefix: impl Into<String>, out: W) -> Self {
        Self {
            prefix: prefix.into(),
            state: Mutex::new(DisplayState {
                labels: Vec::new(),
                out,
            }),
        }
    }

    /// Appends `label` as a new line below the existing ones and prints it.
    ///
    /// Duplicate labels are rejected: a second registration of the same label
    /// returns [`DisplayError::DuplicateLabel`] and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::DuplicateLabel`] for an already registered
    /// label, or [`DisplayError::Io`] if the stream cannot be written.
    pub fn register(&self, label: &str) -> Result<LineHandle, DisplayError> {
        let mut state = self.lock();
        if state.labels.iter().any(|existing| existing == label) {
            return Err(DisplayError::duplicate_label(label));
        }

        let position = state.labels.len();
        state.labels.push(label.to_string());
        write!(state.out, "{} {} ... \r\n", self.prefix, label)?;
        state.out.flush()?;

        trace!(label, position, "registered progress line");
        Ok(LineHandle {
            label: label.to_string(),
            position,
        })
    }

    /// Rewrites the line of `label` so it ends with `status`.
    ///
    /// Repeating the same update renders the same line.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::UnknownLabel`] without writing anything if
    /// `label` was never registered, or [`DisplayError::Io`] if the stream
    /// cannot be written.
    pub fn update(&self, label: &str, status: impl fmt::Display) -> Result<(), DisplayError> {
        let mut state = self.lock();
        let position = state
            .labels
            .iter()
            .position(|existing| existing == label)
            .ok_or_else(|| DisplayError::unknown_label(label))?;

        // The cursor sits one line below the last registered line.
        let distance = state.labels.len() - position;
        let out = &mut state.out;
        write!(out, "{ESC}[{distance}A")?;
        write!(out, "{ESC}[2K\r")?;
        write!(out, "{} {} ... {}\r", self.prefix, label, status)?;
        write!(out, "{ESC}[{distance}B")?;
        out.flush()?;
        Ok(())
    }

    /// Labels in registration order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.lock().labels.clone()
    }

    /// Number of registered lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().labels.len()
    }

    /// Returns true if nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().labels.is_empty()
    }

    /// Consumes the display and returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }

    fn lock(&self) -> MutexGuard<'_, DisplayState<W>> {
        // A panic mid-write leaves at worst a half-drawn line; keep going.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
