//! Shared error types for the crate

use thiserror::Error;

/// Main error type for lstar-tools operations
#[derive(Debug, Error)]
pub enum Error {
    /// An argument did not match the type declared by a [`TypeGuard`](crate::guard::TypeGuard).
    #[error(
        "Invalid type for arguments, expecting: {} and received {received}",
        expected.join(", ")
    )]
    TypeMismatch {
        /// Short names of every expected type, receiver types already resolved.
        expected: Vec<String>,
        /// Short name of the offending argument's runtime type.
        received: String,
        /// Zero-based index of the offending positional argument.
        position: usize,
    },

    /// Severity name that is not one of the known levels
    #[error("Unknown severity level: {0}")]
    UnknownLevel(String),

    /// A value whose serialized form is not a key/value mapping
    #[error("State must serialize to a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// JSON (de)serialization errors while reading or restoring state
    #[error(transparent)]
    State(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this is a type mismatch raised by a guard
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Result type alias using the crate error
pub type Result<T, E = Error> = std::result::Result<T, E>;
