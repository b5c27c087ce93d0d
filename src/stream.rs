//! Output streams emitters write to.
//!
//! A [`TerminalStream`] is any `Write` that can also answer whether it is an
//! interactive terminal. The colour emitter asks on every record; a failed
//! query is treated as "not interactive".

use parking_lot::Mutex;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait TerminalStream: Write + Send {
    /// Whether the stream is attached to an interactive terminal.
    fn is_tty(&self) -> io::Result<bool> {
        Ok(false)
    }
}

impl TerminalStream for io::Stderr {
    fn is_tty(&self) -> io::Result<bool> {
        Ok(self.is_terminal())
    }
}

impl TerminalStream for io::Stdout {
    fn is_tty(&self) -> io::Result<bool> {
        Ok(self.is_terminal())
    }
}

impl TerminalStream for std::fs::File {
    fn is_tty(&self) -> io::Result<bool> {
        Ok(self.is_terminal())
    }
}

impl TerminalStream for Vec<u8> {}

impl<S: TerminalStream + ?Sized> TerminalStream for Box<S> {
    fn is_tty(&self) -> io::Result<bool> {
        (**self).is_tty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interactivity {
    #[default]
    NotInteractive,
    Interactive,
    /// The interactivity query itself fails
    Unknown,
}

#[derive(Debug, Default)]
struct Shared {
    buffer: Mutex<Vec<u8>>,
    flushes: AtomicUsize,
}

/// In-memory stream whose clones all share one buffer.
///
/// Hand one clone to an emitter and keep another to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    shared: Arc<Shared>,
    interactivity: Interactivity,
    fail_writes: bool,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stream that reports itself as a terminal.
    pub fn interactive() -> Self {
        Self::new().with_interactivity(Interactivity::Interactive)
    }

    #[must_use]
    pub fn with_interactivity(mut self, interactivity: Interactivity) -> Self {
        self.interactivity = interactivity;
        self
    }

    /// Make every write fail with `BrokenPipe`.
    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.shared.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn flush_count(&self) -> usize {
        self.shared.flushes.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.shared.buffer.lock().clear();
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"));
        }
        self.shared.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.shared.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl TerminalStream for MemoryStream {
    fn is_tty(&self) -> io::Result<bool> {
        match self.interactivity {
            Interactivity::Interactive => Ok(true),
            Interactivity::NotInteractive => Ok(false),
            Interactivity::Unknown => Err(io::Error::other("interactivity unknown")),
        }
    }
}
