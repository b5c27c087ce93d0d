//! Testing support for code that logs through lstar-tools.
//!
//! - **Capture helpers**: loggers and emitters writing into a [`MemoryStream`]
//!   instead of stderr, so tests can assert on exact lines
//! - **Assertion macros**: Result, type-mismatch and colour assertions
//!
//! # Quick Start
//!
//! ```rust
//! use lstar_tools::testkit::capturing_logger;
//! use lstar_tools::{log_warn, EmitterKind, MemoryStream};
//!
//! let (logger, out) = capturing_logger("Learner", EmitterKind::Plain, MemoryStream::new());
//! log_warn!(logger, "table is not consistent");
//!
//! assert!(out.contents().contains("[WARNING]"));
//! ```

pub mod assertions;

// proptest_generators is only available in tests (proptest is a dev-dependency)
#[cfg(test)]
pub mod proptest_generators;

use crate::emitter::{self, Emitter, EmitterKind};
use crate::formatting::EmitterConfig;
use crate::logger::Logger;
use crate::stream::MemoryStream;
use std::sync::Arc;

/// Emitter of `kind` writing into `stream`, with default settings.
pub fn capture_emitter(kind: EmitterKind, stream: MemoryStream) -> Arc<dyn Emitter> {
    emitter::build(stream, kind, &EmitterConfig::default())
}

/// Unregistered logger with a single capturing emitter and propagation off.
///
/// Returns the logger and a handle on the stream it writes to.
pub fn capturing_logger(
    name: &str,
    kind: EmitterKind,
    stream: MemoryStream,
) -> (Logger, MemoryStream) {
    let logger = Logger::new(name);
    logger.set_propagate(false);
    logger.add_handler(capture_emitter(kind, stream.clone()));
    (logger, stream)
}
