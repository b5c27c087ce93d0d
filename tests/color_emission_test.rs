use lstar_tools::emitter::{self, EmitterKind};
use lstar_tools::testkit::capturing_logger;
use lstar_tools::{
    assert_no_ansi, log_critical, log_error, EmitterConfig, LogRecord, MemoryStream, Severity,
};
use pretty_assertions::assert_eq;

fn refuted(level: Severity) -> LogRecord {
    LogRecord::new("Learner", level, "lstar::learner", "refine", "counterexample found").at(42)
}

#[test]
fn test_plain_emitter_never_colors() {
    let out = MemoryStream::interactive();
    let plain = emitter::build(out.clone(), EmitterKind::Plain, &EmitterConfig::default());

    plain.handle(&refuted(Severity::Error));

    assert_eq!(out.contents(), "42: [ERROR] learner:refine: counterexample found\n");
    assert_no_ansi!(out.contents());
}

#[cfg(feature = "color")]
#[test]
fn test_error_is_red_on_a_terminal() {
    let out = MemoryStream::interactive();
    let color = emitter::build(out.clone(), EmitterKind::Color, &EmitterConfig::default());

    color.handle(&refuted(Severity::Error));

    assert_eq!(
        out.contents(),
        "\x1b[31m42: [ERROR] learner:refine: counterexample found\x1b[0m\n"
    );
    lstar_tools::assert_colored!(out.contents(), Severity::Error);
}

#[cfg(feature = "color")]
#[test]
fn test_color_emitter_is_plain_off_terminal() {
    let out = MemoryStream::new();
    let color = emitter::build(out.clone(), EmitterKind::Color, &EmitterConfig::default());

    color.handle(&refuted(Severity::Warning));

    assert_eq!(out.contents(), "42: [WARNING] learner:refine: counterexample found\n");
}

#[cfg(feature = "color")]
#[test]
fn test_each_level_has_its_own_prefix() {
    let expected = [
        (Severity::Debug, "\x1b[36m"),
        (Severity::Info, "\x1b[32m"),
        (Severity::Warning, "\x1b[33m"),
        (Severity::Error, "\x1b[31m"),
        (Severity::Critical, "\x1b[41m\x1b[37m"),
    ];
    for (level, prefix) in expected {
        let out = MemoryStream::interactive();
        let color = emitter::build(out.clone(), EmitterKind::Color, &EmitterConfig::default());
        color.handle(&refuted(level));

        let text = out.contents();
        assert!(text.starts_with(prefix), "{level}: {text:?}");
        assert!(text.ends_with("\x1b[0m\n"), "{level}: {text:?}");
    }
}

#[cfg(feature = "color")]
#[test]
fn test_logger_macros_through_color_emitter() {
    let (logger, out) = capturing_logger("Learner", EmitterKind::Color, MemoryStream::interactive());

    log_critical!(logger, "hypothesis diverged after {} rounds", 12);

    let text = out.contents();
    assert!(text.starts_with("\x1b[41m\x1b[37m"));
    assert!(text.contains(
        "[CRITICAL] color_emission_test:test_logger_macros_through_color_emitter: \
         hypothesis diverged after 12 rounds"
    ));
}

#[test]
fn test_write_failure_does_not_reach_the_caller() {
    emitter::set_report_errors(false);
    let before = emitter::emission_failures();
    let (logger, _out) =
        capturing_logger("Learner", EmitterKind::Plain, MemoryStream::new().failing_writes());

    log_error!(logger, "lost");

    assert!(emitter::emission_failures() > before);
}
