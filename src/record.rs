//! Log records and the call-site information they carry.
//!
//! A [`LogRecord`] is built by a logging call, handed synchronously to every
//! emitter attached to the logger, then dropped. Timestamps are expressed in
//! milliseconds relative to the process clock anchor, which is set the first
//! time anything in this crate asks for it (attaching a logger does).

use crate::level::Severity;
use once_cell::sync::Lazy;
use std::fmt;
use std::time::Instant;

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Instant all relative timestamps are measured from.
pub fn process_start() -> Instant {
    *PROCESS_START
}

/// Milliseconds elapsed since [`process_start`].
pub fn relative_millis() -> u128 {
    PROCESS_START.elapsed().as_millis()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the logger that produced the record
    pub name: String,
    pub level: Severity,
    /// Last segment of the originating module path
    pub module: String,
    pub function: String,
    pub message: String,
    pub relative_ms: u128,
}

impl LogRecord {
    /// Build a record stamped with the current relative time.
    pub fn new(
        name: impl Into<String>,
        level: Severity,
        module: &str,
        function: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            module: module_basename(module).to_string(),
            function: function.into(),
            message: message.into(),
            relative_ms: relative_millis(),
        }
    }

    /// Replace the timestamp, mainly so tests can assert on exact lines.
    #[must_use]
    pub fn at(mut self, relative_ms: u128) -> Self {
        self.relative_ms = relative_ms;
        self
    }
}

/// One line per record:
/// `{relative_ms}: [{level}] {module}:{function}: {message}`.
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {}:{}: {}",
            self.relative_ms, self.level, self.module, self.function, self.message
        )
    }
}

/// `a::b::c` -> `c`
pub fn module_basename(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Reduce the type name of a nested marker fn to the enclosing function name.
///
/// Used by [`function_name!`](crate::function_name); closures are skipped so a
/// call inside `|| ...` still reports the function that contains it.
pub fn function_basename(marker: &str) -> &str {
    let mut path = marker.strip_suffix("::__marker").unwrap_or(marker);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    module_basename(path)
}

/// Name of the function this macro is expanded in.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __marker() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::record::function_basename(__type_name_of(__marker))
    }};
}
