//! Validation failures

use thiserror::Error;

use crate::kind::Kind;

/// Why a value was rejected.
///
/// The rendered message is the whole report: composite descriptors pass a
/// field's failure through unchanged, without naming the field's path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Not a {0}")]
    TypeMismatch(Kind),

    #[error("Not an object")]
    NotAnObject,

    #[error("Missing key '{0}'")]
    MissingKey(String),

    #[error("Unknown key '{0}'")]
    UnknownKey(String),
}

/// Result of applying a descriptor to a value.
pub type Outcome<T> = Result<T, ValidationError>;
