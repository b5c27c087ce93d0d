use lstar_tools::registry::{attach, get_logger, Logged};
use lstar_tools::{log_warn, Severity};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

struct RootCapture;

static ROOT_RECORDS: Lazy<Mutex<Vec<(log::Level, String, String)>>> = Lazy::new(Default::default);
static ROOT: RootCapture = RootCapture;

impl log::Log for RootCapture {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        if record.target().starts_with("Propagation") {
            ROOT_RECORDS.lock().push((
                record.level(),
                record.target().to_string(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {}
}

fn install_root() {
    let _ = log::set_logger(&ROOT);
    log::set_max_level(log::LevelFilter::Trace);
}

fn forwarded_for(name: &str) -> Vec<(log::Level, String)> {
    ROOT_RECORDS
        .lock()
        .iter()
        .filter(|(_, target, _)| target == name)
        .map(|(level, _, message)| (*level, message.clone()))
        .collect()
}

#[test]
fn test_unattached_logger_forwards_to_root() {
    install_root();
    let logger = get_logger("PropagationPlain");
    assert!(logger.propagate());

    log_warn!(logger, "cache miss for {}", "ab");

    assert_eq!(
        forwarded_for("PropagationPlain"),
        vec![(log::Level::Warn, "cache miss for ab".to_string())]
    );
}

struct PropagationAttached;
impl Logged for PropagationAttached {}

#[test]
fn test_attached_logger_stops_propagation() {
    install_root();
    let logger = attach::<PropagationAttached>();

    log_warn!(logger, "only on the class emitter");

    assert!(!logger.propagate());
    assert!(forwarded_for("PropagationAttached").is_empty());
}

#[test]
fn test_critical_maps_to_root_error() {
    install_root();
    let logger = get_logger("PropagationCritical");

    logger.log(
        Severity::Critical,
        module_path!(),
        "test_critical_maps_to_root_error",
        format_args!("diverged"),
    );

    assert_eq!(
        forwarded_for("PropagationCritical"),
        vec![(log::Level::Error, "diverged".to_string())]
    );
}
