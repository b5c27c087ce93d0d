//! Proptest strategies for levels, messages and type paths.

use crate::level::Severity;
use proptest::prelude::*;

pub fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

/// Messages without line breaks, so one record stays one line.
pub fn message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.:;!?_-]{0,40}"
}

/// Paths such as `lstar::table::Row`.
pub fn type_path() -> impl Strategy<Value = (Vec<String>, String)> {
    (
        prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..4),
        "[A-Z][A-Za-z0-9]{0,10}",
    )
}
