//! Log-record sinks.
//!
//! An [`Emitter`] turns a [`LogRecord`] into output on a stream. Two
//! implementations exist:
//!
//! - [`StreamEmitter`]: writes the formatted line verbatim
//! - [`ColorStreamEmitter`] (feature `color`): wraps the line in the
//!   severity's ANSI colour when the stream is an interactive terminal
//!
//! Which one the attacher installs is decided once per process by
//! [`selected_kind`]. Every emission is synchronous: format, write, flush,
//! all on the calling thread.
//!
//! ## Failures
//!
//! I/O errors raised while emitting never reach the caller. They are routed
//! to [`handle_error`], which reports them on stderr and counts them. Panics
//! are not caught and unwind to the logging call site.

#[cfg(feature = "color")]
mod color;
mod plain;

#[cfg(feature = "color")]
pub use color::ColorStreamEmitter;
pub use plain::StreamEmitter;

use crate::formatting::{process_config, ColorMode, EmitterConfig};
use crate::level::Severity;
use crate::record::LogRecord;
use crate::stream::TerminalStream;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Appended after every formatted record.
pub const TERMINATOR: &str = "\n";

static REPORT_ERRORS: AtomicBool = AtomicBool::new(true);
static EMISSION_FAILURES: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterKind {
    Plain,
    Color,
}

pub trait Emitter: Send + Sync {
    fn kind(&self) -> EmitterKind;

    fn level(&self) -> Severity;

    fn set_level(&self, level: Severity);

    /// Write one record and flush. Errors are returned, not handled.
    fn emit(&self, record: &LogRecord) -> io::Result<()>;

    /// Emit `record` if it passes the level threshold.
    ///
    /// Returns whether the record was accepted. Emission errors are passed to
    /// [`handle_error`] and never returned.
    fn handle(&self, record: &LogRecord) -> bool {
        if record.level < self.level() {
            return false;
        }
        if let Err(err) = self.emit(record) {
            handle_error(record, &err);
        }
        true
    }
}

/// Fallback for records that could not be emitted. Never fails.
pub fn handle_error(record: &LogRecord, err: &io::Error) {
    EMISSION_FAILURES.fetch_add(1, Ordering::SeqCst);
    if !REPORT_ERRORS.load(Ordering::Relaxed) {
        return;
    }
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "--- Logging error ---\n{}\nLogger {:?}, {} record from {}:{}: {}",
        err, record.name, record.level, record.module, record.function, record.message
    );
}

/// Turn stderr reporting in [`handle_error`] on or off.
pub fn set_report_errors(enabled: bool) {
    REPORT_ERRORS.store(enabled, Ordering::Relaxed);
}

/// Number of records that failed to emit since process start.
pub fn emission_failures() -> usize {
    EMISSION_FAILURES.load(Ordering::SeqCst)
}

static SELECTED_KIND: Lazy<EmitterKind> = Lazy::new(|| select_kind(process_config()));

fn select_kind(config: &EmitterConfig) -> EmitterKind {
    if cfg!(feature = "color") && config.color != ColorMode::Never {
        EmitterKind::Color
    } else {
        EmitterKind::Plain
    }
}

/// Emitter kind used for every attachment in this process.
pub fn selected_kind() -> EmitterKind {
    *SELECTED_KIND
}

/// Build an emitter of `kind` over `stream`, configured from `config`.
///
/// Without the `color` feature a colour request yields a plain emitter.
#[cfg_attr(not(feature = "color"), allow(unused_variables))]
pub fn build<S>(stream: S, kind: EmitterKind, config: &EmitterConfig) -> Arc<dyn Emitter>
where
    S: TerminalStream + 'static,
{
    match kind {
        #[cfg(feature = "color")]
        EmitterKind::Color => Arc::new(
            ColorStreamEmitter::new(stream).with_mode(config.color),
        ),
        _ => Arc::new(StreamEmitter::new(stream)),
    }
}

/// The emitter the attacher installs by default: stderr, process settings.
pub fn default_emitter() -> Arc<dyn Emitter> {
    build(io::stderr(), selected_kind(), process_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MemoryStream;

    fn record(level: Severity) -> LogRecord {
        LogRecord::new("Learner", level, "lstar::learner", "ask", "query sent").at(3)
    }

    #[test]
    fn test_handle_skips_records_below_threshold() {
        let stream = MemoryStream::new();
        let emitter = build(
            stream.clone(),
            EmitterKind::Plain,
            &EmitterConfig::default(),
        );
        emitter.set_level(Severity::Warning);

        assert!(!emitter.handle(&record(Severity::Info)));
        assert!(emitter.handle(&record(Severity::Error)));
        assert_eq!(stream.lines(), vec!["3: [ERROR] learner:ask: query sent"]);
    }

    #[test]
    fn test_failed_emission_is_counted_not_raised() {
        set_report_errors(false);
        let before = emission_failures();
        let emitter = build(
            MemoryStream::new().failing_writes(),
            EmitterKind::Plain,
            &EmitterConfig::default(),
        );

        assert!(emitter.handle(&record(Severity::Critical)));
        assert!(emission_failures() > before);
    }

    #[test]
    fn test_never_selects_plain() {
        let config = EmitterConfig {
            color: ColorMode::Never,
        };
        assert_eq!(select_kind(&config), EmitterKind::Plain);
    }

    #[cfg(feature = "color")]
    #[test]
    fn test_auto_selects_color_when_available() {
        assert_eq!(select_kind(&EmitterConfig::default()), EmitterKind::Color);
        let emitter = build(MemoryStream::new(), EmitterKind::Color, &EmitterConfig::default());
        assert_eq!(emitter.kind(), EmitterKind::Color);
    }

    #[cfg(not(feature = "color"))]
    #[test]
    fn test_color_request_degrades_to_plain() {
        assert_eq!(select_kind(&EmitterConfig::default()), EmitterKind::Plain);
        let emitter = build(MemoryStream::new(), EmitterKind::Color, &EmitterConfig::default());
        assert_eq!(emitter.kind(), EmitterKind::Plain);
    }
}
