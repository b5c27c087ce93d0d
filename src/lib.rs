//! Support code shared by the LSTAR inference crates.
//!
//! - [`registry`]: one colourised logger per type, attached on first use
//! - [`state`]: snapshots of logged values that never include their logger
//! - [`guard`]: runtime argument type checks for dynamically typed calls

// Export modules for library usage
pub mod emitter;
pub mod error;
pub mod formatting;
pub mod guard;
pub mod level;
pub mod logger;
pub mod record;
pub mod registry;
pub mod state;
pub mod stream;
pub mod testkit;

// Re-export commonly used types
pub use crate::error::{Error, Result};
pub use crate::level::Severity;
pub use crate::logger::Logger;
pub use crate::record::LogRecord;

pub use crate::emitter::{Emitter, EmitterKind, StreamEmitter};

#[cfg(feature = "color")]
pub use crate::emitter::ColorStreamEmitter;

pub use crate::formatting::{ColorMode, EmitterConfig};

pub use crate::registry::{attach, get_logger, ClassLogger, Logged};

pub use crate::state::{Snapshot, StateMap};

pub use crate::guard::{Argument, Arguments, Expected, Guarded, TypeGuard, TypeSpec};

pub use crate::stream::{MemoryStream, TerminalStream};
