//! Assertion macros for guard results and emitted lines.
//!
//! Every macro reports the call site on failure.
//!
//! ```rust
//! use lstar_tools::{assert_rejected, assert_result_ok, Severity};
//!
//! let level = assert_result_ok!("warn".parse::<Severity>());
//! assert_eq!(level, Severity::Warning);
//!
//! assert_rejected!("loud".parse::<Severity>(), "loud");
//! ```

/// Unwrap an `Ok` value, or panic with the error and the call site.
#[macro_export]
macro_rules! assert_result_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "Expected Ok, got Err: {:?}\n  at {}:{}",
                e,
                file!(),
                line!()
            ),
        }
    };
}

/// Assert that a Result is an error whose message contains `pattern`, and
/// return the error.
#[macro_export]
macro_rules! assert_rejected {
    ($result:expr, $pattern:expr) => {
        match $result {
            Ok(value) => panic!(
                "Expected rejection containing {:?}, got Ok: {:?}\n  at {}:{}",
                $pattern,
                value,
                file!(),
                line!()
            ),
            Err(e) => {
                let message = e.to_string();
                assert!(
                    message.contains($pattern),
                    "Error {:?} does not mention {:?}\n  at {}:{}",
                    message,
                    $pattern,
                    file!(),
                    line!()
                );
                e
            }
        }
    };
}

/// Assert that a guard rejected an argument and extract
/// `(expected, received)`.
///
/// ```rust
/// use lstar_tools::{assert_type_mismatch, type_check, Arguments};
///
/// struct Learner;
/// let learner = Learner;
/// let args = Arguments::new(&learner).arg(&7u8);
/// let (expected, received) = assert_type_mismatch!(type_check![String].check(&args));
/// assert_eq!(expected, vec!["String"]);
/// assert_eq!(received, "u8");
/// ```
#[macro_export]
macro_rules! assert_type_mismatch {
    ($result:expr) => {
        match $result {
            Err($crate::error::Error::TypeMismatch {
                expected, received, ..
            }) => (expected, received),
            Err(other) => panic!(
                "Expected a type mismatch, got: {}\n  at {}:{}",
                other,
                file!(),
                line!()
            ),
            Ok(value) => panic!(
                "Expected a type mismatch, guard passed with {:?}\n  at {}:{}",
                value,
                file!(),
                line!()
            ),
        }
    };
}

#[macro_export]
macro_rules! assert_no_ansi {
    ($text:expr) => {{
        let text: &str = &$text;
        assert!(
            !text.contains('\x1b'),
            "Unexpected escape sequence in {:?}\n  at {}:{}",
            text,
            file!(),
            line!()
        );
    }};
}

/// Assert that every line of `text` is wrapped in `level`'s colour.
#[cfg(feature = "color")]
#[macro_export]
macro_rules! assert_colored {
    ($text:expr, $level:expr) => {{
        let text: &str = &$text;
        let prefix = $crate::formatting::color_prefix($level);
        for line in text.lines() {
            assert!(
                line.starts_with(&prefix) && line.ends_with($crate::formatting::RESET),
                "Line {:?} is not coloured for {}\n  at {}:{}",
                line,
                $level,
                file!(),
                line!()
            );
        }
    }};
}
