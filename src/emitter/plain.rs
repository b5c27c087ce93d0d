use super::{Emitter, EmitterKind, TERMINATOR};
use crate::level::Severity;
use crate::record::LogRecord;
use crate::stream::TerminalStream;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::io;

/// Writes formatted records to a stream without any decoration.
pub struct StreamEmitter<S> {
    stream: Mutex<S>,
    level: RwLock<Severity>,
}

impl<S: TerminalStream> StreamEmitter<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Mutex::new(stream),
            level: RwLock::new(Severity::Debug),
        }
    }

    #[must_use]
    pub fn with_level(self, level: Severity) -> Self {
        *self.level.write() = level;
        self
    }

    pub(super) fn lock_stream(&self) -> MutexGuard<'_, S> {
        self.stream.lock()
    }
}

/// Write `parts` then the terminator, and flush.
pub(super) fn write_line<S: TerminalStream>(stream: &mut S, parts: &[&str]) -> io::Result<()> {
    for part in parts {
        stream.write_all(part.as_bytes())?;
    }
    stream.write_all(TERMINATOR.as_bytes())?;
    stream.flush()
}

impl<S: TerminalStream> Emitter for StreamEmitter<S> {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Plain
    }

    fn level(&self) -> Severity {
        *self.level.read()
    }

    fn set_level(&self, level: Severity) {
        *self.level.write() = level;
    }

    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        let line = record.to_string();
        let mut stream = self.lock_stream();
        write_line(&mut *stream, &[&line])
    }
}
