//! Log sink that can hold back output while the progress lines are live.
//!
//! The progress display moves the cursor relative to the last line it
//! printed, so any other output on the terminal during a run lands lines in
//! the wrong rows. While held, formatted log events are queued in memory and
//! written out in order on [`DeferredLog::release`].

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug)]
struct State<W> {
    holding: bool,
    pending: Vec<u8>,
    out: W,
}

/// `MakeWriter` that writes to `W` unless output is currently held.
#[derive(Debug)]
pub struct DeferredLog<W> {
    state: Arc<Mutex<State<W>>>,
}

impl<W> Clone for DeferredLog<W> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl DeferredLog<io::Stderr> {
    /// Deferred sink over the process's standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> DeferredLog<W> {
    /// Creates a sink that passes writes straight through to `out`.
    pub fn new(out: W) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                holding: false,
                pending: Vec::new(),
                out,
            })),
        }
    }

    /// Queues all further writes until [`release`](Self::release).
    pub fn hold(&self) {
        self.lock().holding = true;
    }

    /// Writes out everything queued since [`hold`](Self::hold) and resumes
    /// passing writes through.
    pub fn release(&self) -> io::Result<()> {
        let mut state = self.lock();
        state.holding = false;
        let pending = std::mem::take(&mut state.pending);
        state.out.write_all(&pending)?;
        state.out.flush()
    }

    fn lock(&self) -> MutexGuard<'_, State<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Per-event writer handed out by [`DeferredLog`].
#[derive(Debug)]
pub struct DeferredLogWriter<W> {
    log: DeferredLog<W>,
}

impl<W: Write> Write for DeferredLogWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.log.lock();
        if state.holding {
            state.pending.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            state.out.write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.log.lock();
        if state.holding {
            return Ok(());
        }
        state.out.flush()
    }
}

impl<'a, W: Write + 'a> MakeWriter<'a> for DeferredLog<W> {
    type Writer = DeferredLogWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        DeferredLogWriter { log: self.clone() }
    }
}
