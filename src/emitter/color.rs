use super::plain::write_line;
use super::{Emitter, EmitterKind, StreamEmitter};
use crate::formatting::{color_prefix, ColorMode, RESET};
use crate::level::Severity;
use crate::record::LogRecord;
use crate::stream::TerminalStream;
use std::io;

/// A [`StreamEmitter`] that colours each line by severity.
///
/// In [`ColorMode::Auto`] the stream is asked on every record whether it is
/// a terminal; a failing query counts as "no".
pub struct ColorStreamEmitter<S> {
    inner: StreamEmitter<S>,
    mode: ColorMode,
}

impl<S: TerminalStream> ColorStreamEmitter<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: StreamEmitter::new(stream),
            mode: ColorMode::Auto,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Severity) -> Self {
        self.inner = self.inner.with_level(level);
        self
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }
}

impl<S: TerminalStream> Emitter for ColorStreamEmitter<S> {
    fn kind(&self) -> EmitterKind {
        EmitterKind::Color
    }

    fn level(&self) -> Severity {
        self.inner.level()
    }

    fn set_level(&self, level: Severity) {
        self.inner.set_level(level);
    }

    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        let line = record.to_string();
        let mut stream = self.inner.lock_stream();
        let is_tty = match self.mode {
            ColorMode::Auto => stream.is_tty().unwrap_or(false),
            _ => false,
        };
        if self.mode.should_use_color(is_tty) {
            let prefix = color_prefix(record.level);
            write_line(&mut *stream, &[&prefix, &line, RESET])
        } else {
            write_line(&mut *stream, &[&line])
        }
    }
}
