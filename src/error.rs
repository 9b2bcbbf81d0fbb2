use std::sync::Arc;

use thiserror::Error;

use crate::FlagType;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding flag payloads or evaluating flags.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The caller requested a value type different from the type declared on the flag.
    #[error("invalid flag type (expected: {expected:?}, found: {found:?})")]
    TypeMismatch {
        /// Type requested by the caller.
        expected: FlagType,
        /// Type declared on the flag.
        found: FlagType,
    },

    /// The flag value could not be parsed as the flag's declared type. This points at malformed
    /// flag data sent by the management service.
    #[error("unable to parse {value:?} as {flag_type:?}")]
    CoercionFailure {
        /// Type declared on the flag.
        flag_type: FlagType,
        /// Raw value that failed to parse.
        value: String,
    },

    /// The requested flag is not known to the store.
    #[error("flag not found")]
    FlagNotFound,

    /// A bootstrap snapshot or an event could not be decoded.
    // serde_json::Error is not clonable, so we're wrapping it in an Arc.
    #[error("error parsing flag payload")]
    Parse(#[source] Arc<serde_json::Error>),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(Arc::new(value))
    }
}
