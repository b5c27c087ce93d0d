//! Named loggers.
//!
//! A [`Logger`] owns a list of emitters and hands every accepted record to
//! each of them in order. When `propagate` is set, records are also passed
//! to the global `log` facade, which plays the part of the root logger.
//! Class loggers created by the attacher have propagation turned off so a
//! root backend never prints their lines a second time.

use crate::emitter::Emitter;
use crate::level::Severity;
use crate::record::LogRecord;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Function name recorded for messages that arrive through the `log` facade.
pub const UNKNOWN_FUNCTION: &str = "(unknown)";

pub struct Logger {
    name: String,
    level: RwLock<Severity>,
    handlers: RwLock<Vec<Arc<dyn Emitter>>>,
    propagate: AtomicBool,
    configured: OnceCell<()>,
}

impl Logger {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: RwLock::new(Severity::Debug),
            handlers: RwLock::new(Vec::new()),
            propagate: AtomicBool::new(true),
            configured: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        *self.level.read()
    }

    pub fn set_level(&self, level: Severity) {
        *self.level.write() = level;
    }

    pub fn is_enabled_for(&self, level: Severity) -> bool {
        level >= self.level()
    }

    pub fn add_handler(&self, handler: Arc<dyn Emitter>) {
        self.handlers.write().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn handlers(&self) -> Vec<Arc<dyn Emitter>> {
        self.handlers.read().clone()
    }

    pub fn propagate(&self) -> bool {
        self.propagate.load(Ordering::SeqCst)
    }

    pub fn set_propagate(&self, propagate: bool) {
        self.propagate.store(propagate, Ordering::SeqCst);
    }

    /// Run `setup` the first time it is called for this logger only.
    ///
    /// Returns true when `setup` ran.
    pub(crate) fn configure_once(&self, setup: impl FnOnce(&Self)) -> bool {
        let mut ran = false;
        self.configured.get_or_init(|| {
            setup(self);
            ran = true;
        });
        ran
    }

    pub fn is_configured(&self) -> bool {
        self.configured.get().is_some()
    }

    /// Build a record for `message` and dispatch it, if `level` is enabled.
    ///
    /// `module` may be a full module path; only its last segment is kept.
    pub fn log(&self, level: Severity, module: &str, function: &str, message: fmt::Arguments<'_>) {
        if !self.is_enabled_for(level) {
            return;
        }
        let record = LogRecord::new(self.name.as_str(), level, module, function, message.to_string());
        self.handle(&record);
    }

    /// Dispatch an already-built record to every handler.
    pub fn handle(&self, record: &LogRecord) {
        for handler in self.handlers.read().iter() {
            handler.handle(record);
        }
        if self.propagate() {
            self.forward_to_root(record);
        }
    }

    fn forward_to_root(&self, record: &LogRecord) {
        log::Log::log(
            log::logger(),
            &log::Record::builder()
                .level(record.level.into())
                .target(&self.name)
                .module_path(Some(record.module.as_str()))
                .args(format_args!("{}", record.message))
                .build(),
        );
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("handlers", &self.handler_count())
            .field("propagate", &self.propagate())
            .finish()
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.is_enabled_for(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = Severity::from(record.level());
        if !self.is_enabled_for(level) {
            return;
        }
        let module = record.module_path().unwrap_or_else(|| record.target());
        let record = LogRecord::new(
            self.name.as_str(),
            level,
            module,
            UNKNOWN_FUNCTION,
            record.args().to_string(),
        );
        for handler in self.handlers.read().iter() {
            handler.handle(&record);
        }
    }

    fn flush(&self) {}
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, $logger:expr, $($arg:tt)+) => {
        $crate::logger::Logger::log(
            &$logger,
            $level,
            ::std::module_path!(),
            $crate::function_name!(),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Log at DEBUG through a [`Logger`], recording the calling module and function.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::level::Severity::Debug, $logger, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::level::Severity::Info, $logger, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::level::Severity::Warning, $logger, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::level::Severity::Error, $logger, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($crate::level::Severity::Critical, $logger, $($arg)+)
    };
}
