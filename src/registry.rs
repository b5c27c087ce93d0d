//! Process-wide logger registry and per-type logger attachment.
//!
//! Loggers are registered by name and never removed. A type opts in by
//! implementing [`Logged`]; the first call to [`attach`] for that type
//! creates (or finds) the logger named after it, installs one DEBUG-level
//! emitter on it unless it already has handlers, and turns propagation off.
//! Later calls, for the same type or for another type sharing the name,
//! return the same logger untouched.
//!
//! ```rust
//! use lstar_tools::registry::{attach, Logged};
//!
//! struct ObservationTable;
//! impl Logged for ObservationTable {}
//!
//! let logger = attach::<ObservationTable>();
//! assert_eq!(logger.name(), "ObservationTable");
//! assert_eq!(attach::<ObservationTable>().handler_count(), 1);
//! ```

use crate::emitter::{self, Emitter};
use crate::level::Severity;
use crate::logger::Logger;
use crate::record;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

static LOGGERS: Lazy<Mutex<HashMap<String, Arc<Logger>>>> = Lazy::new(Default::default);
static ATTACHED: Lazy<Mutex<HashMap<TypeId, Arc<Logger>>>> = Lazy::new(Default::default);

/// Types that get a class logger.
///
/// All methods have defaults; `impl Logged for MyType {}` is enough.
pub trait Logged: 'static {
    /// Name the class logger is registered under.
    fn logger_name() -> String {
        short_type_name(type_name::<Self>())
    }

    /// A logger this type already owns. When this returns `Some`, attachment
    /// uses it as is and installs nothing.
    fn declared_logger() -> Option<Arc<Logger>> {
        None
    }

    /// Emitter installed the first time the class logger is configured.
    fn emitter() -> Arc<dyn Emitter> {
        emitter::default_emitter()
    }

    fn class_logger() -> Arc<Logger> {
        attach::<Self>()
    }
}

/// Find or create the logger registered under `name`. No emitter is added.
pub fn get_logger(name: &str) -> Arc<Logger> {
    let mut loggers = LOGGERS.lock();
    Arc::clone(
        loggers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Logger::new(name))),
    )
}

pub fn is_registered(name: &str) -> bool {
    LOGGERS.lock().contains_key(name)
}

/// Names of all registered loggers, sorted.
pub fn registered_names() -> Vec<String> {
    let mut names: Vec<String> = LOGGERS.lock().keys().cloned().collect();
    names.sort();
    names
}

pub fn is_attached<T: Logged + ?Sized>() -> bool {
    ATTACHED.lock().contains_key(&TypeId::of::<T>())
}

/// Attach the class logger for `T`, or return the one already attached.
pub fn attach<T: Logged + ?Sized>() -> Arc<Logger> {
    let type_id = TypeId::of::<T>();
    if let Some(logger) = ATTACHED.lock().get(&type_id) {
        return Arc::clone(logger);
    }
    let _ = record::process_start();

    // The table lock is released while running the type's hooks so a hook
    // may itself attach other types.
    let logger = match T::declared_logger() {
        Some(logger) => {
            log::debug!(
                "{} declares logger {:?}, skipping attachment",
                type_name::<T>(),
                logger.name()
            );
            logger
        }
        None => attach_with(&T::logger_name(), T::emitter),
    };

    let mut attached = ATTACHED.lock();
    Arc::clone(attached.entry(type_id).or_insert(logger))
}

/// Attach a logger by name using the process default emitter.
pub fn attach_named(name: &str) -> Arc<Logger> {
    attach_with(name, emitter::default_emitter)
}

fn attach_with(name: &str, make_emitter: impl FnOnce() -> Arc<dyn Emitter>) -> Arc<Logger> {
    let logger = get_logger(name);
    let configured = logger.configure_once(|logger| {
        // A logger that already writes somewhere keeps its handlers as they are.
        if logger.handler_count() == 0 {
            let emitter = make_emitter();
            emitter.set_level(Severity::Debug);
            log::debug!("Attaching {:?} emitter to logger {:?}", emitter.kind(), name);
            logger.add_handler(emitter);
        } else {
            log::debug!(
                "Logger {:?} already has {} handler(s), not adding another",
                name,
                logger.handler_count()
            );
        }
        logger.set_propagate(false);
    });
    if !configured {
        log::trace!("Logger {:?} already configured", name);
    }
    logger
}

/// Strip module paths from every path inside a type name.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            out.push_str(record::module_basename(&path));
            path.clear();
            out.push(c);
        }
    }
    out.push_str(record::module_basename(&path));
    out
}

/// Handle to `T`'s class logger, meant to be stored in `T` itself.
///
/// It has no serde impls, so it has to be marked `#[serde(skip)]`; on
/// deserialization `Default` binds it to the class logger again.
///
/// ```rust
/// use lstar_tools::registry::{ClassLogger, Logged};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Oracle {
///     #[serde(skip)]
///     log: ClassLogger<Oracle>,
///     queries: u32,
/// }
///
/// impl Logged for Oracle {}
///
/// let restored: Oracle = serde_json::from_str(r#"{"queries":3}"#).unwrap();
/// assert_eq!(restored.log.name(), "Oracle");
/// ```
pub struct ClassLogger<T> {
    logger: Arc<Logger>,
    _owner: PhantomData<fn() -> T>,
}

impl<T: Logged> ClassLogger<T> {
    pub fn new() -> Self {
        Self {
            logger: attach::<T>(),
            _owner: PhantomData,
        }
    }

    /// Re-acquire the class logger by name.
    pub fn rebind(&mut self) {
        self.logger = attach::<T>();
    }
}

impl<T> ClassLogger<T> {
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl<T: Logged> Default for ClassLogger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ClassLogger<T> {
    fn clone(&self) -> Self {
        Self {
            logger: Arc::clone(&self.logger),
            _owner: PhantomData,
        }
    }
}

impl<T> Deref for ClassLogger<T> {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        &self.logger
    }
}

impl<T> PartialEq for ClassLogger<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.logger, &other.logger)
    }
}

impl<T> fmt::Debug for ClassLogger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassLogger").field(&self.logger.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{EmitterKind, StreamEmitter};
    use crate::stream::MemoryStream;
    use crate::testkit::proptest_generators::type_path;
    use proptest::prelude::*;

    struct Hypothesis;
    impl Logged for Hypothesis {}

    struct Counterexample;
    impl Logged for Counterexample {
        fn logger_name() -> String {
            "RegistryCustomName".to_string()
        }

        fn emitter() -> Arc<dyn Emitter> {
            Arc::new(StreamEmitter::new(MemoryStream::new()))
        }
    }

    struct Prebuilt;
    impl Logged for Prebuilt {
        fn declared_logger() -> Option<Arc<Logger>> {
            Some(get_logger("RegistryPrebuilt"))
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("lstar::Learner"), "Learner");
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(short_type_name("(i32, core::option::Option<u8>)"), "(i32, Option<u8>)");
    }

    #[test]
    fn test_attach_is_idempotent() {
        let first = attach::<Hypothesis>();
        let second = attach::<Hypothesis>();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.handler_count(), 1);
        assert_eq!(first.handlers()[0].level(), Severity::Debug);
        assert!(!first.propagate());
        assert!(is_attached::<Hypothesis>());
        assert!(is_registered("Hypothesis"));
    }

    #[test]
    fn test_custom_name_and_emitter() {
        let logger = Counterexample::class_logger();
        assert_eq!(logger.name(), "RegistryCustomName");
        assert_eq!(logger.handlers()[0].kind(), EmitterKind::Plain);
        assert!(registered_names().contains(&"RegistryCustomName".to_string()));
    }

    #[test]
    fn test_declared_logger_skips_configuration() {
        let logger = attach::<Prebuilt>();
        assert_eq!(logger.name(), "RegistryPrebuilt");
        assert_eq!(logger.handler_count(), 0);
        assert!(logger.propagate());
        assert!(!logger.is_configured());
    }

    #[test]
    fn test_attach_named_reuses_existing_configuration() {
        let plain = get_logger("RegistryShared");
        assert_eq!(plain.handler_count(), 0);

        let first = attach_named("RegistryShared");
        let second = attach_named("RegistryShared");

        assert!(Arc::ptr_eq(&plain, &first));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.handler_count(), 1);
    }

    struct Pretrained;
    impl Logged for Pretrained {}

    #[test]
    fn test_attach_keeps_handlers_added_before_it() {
        let out = MemoryStream::new();
        let existing = get_logger("Pretrained");
        existing.add_handler(Arc::new(StreamEmitter::new(out.clone())));

        let logger = attach::<Pretrained>();

        assert!(Arc::ptr_eq(&existing, &logger));
        assert_eq!(logger.handler_count(), 1);
        assert!(!logger.propagate());

        crate::log_info!(logger, "one line");
        assert_eq!(out.lines().len(), 1);
    }

    #[test]
    fn test_class_logger_handle() {
        let handle: ClassLogger<Hypothesis> = ClassLogger::default();
        let mut copy = handle.clone();
        copy.rebind();

        assert_eq!(handle, copy);
        assert_eq!(handle.name(), "Hypothesis");
        assert_eq!(format!("{:?}", handle), "ClassLogger(\"Hypothesis\")");
        assert!(Arc::ptr_eq(handle.logger(), &attach::<Hypothesis>()));
    }

    proptest! {
        #[test]
        fn prop_short_name_is_last_path_segment((modules, name) in type_path()) {
            let mut full = modules.join("::");
            if !full.is_empty() {
                full.push_str("::");
            }
            full.push_str(&name);
            prop_assert_eq!(short_type_name(&full), name);
        }
    }
}
