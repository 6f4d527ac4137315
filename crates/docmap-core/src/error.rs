use crate::{config::ConfigError, db::MappingError, db::executor::WriteError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a store-origin internal error.
    pub(crate) fn store_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, message)
    }

    pub fn store_not_found(key: impl Into<String>) -> Self {
        let key = key.into();

        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Store,
            format!("document not found: {key}"),
        )
    }

    /// Construct a store-origin duplicate-key conflict.
    pub(crate) fn store_duplicate_key(key: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Conflict,
            ErrorOrigin::Store,
            format!("duplicate key: {}", key.into()),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn mapping_error(&self) -> Option<&MappingError> {
        match &self.detail {
            Some(ErrorDetail::Mapping(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn write_error(&self) -> Option<&WriteError> {
        match &self.detail {
            Some(ErrorDetail::Write(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Mapping(MappingError),

    #[error("{0}")]
    Write(WriteError),

    #[error("{0}")]
    Config(ConfigError),
}

impl From<MappingError> for InternalError {
    fn from(err: MappingError) -> Self {
        Self {
            class: err.class(),
            origin: ErrorOrigin::Mapping,
            message: err.to_string(),
            detail: Some(ErrorDetail::Mapping(err)),
        }
    }
}

impl From<WriteError> for InternalError {
    fn from(err: WriteError) -> Self {
        Self {
            class: err.class(),
            origin: ErrorOrigin::Executor,
            message: err.to_string(),
            detail: Some(ErrorDetail::Write(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Conflict,
    Internal,
    InvariantViolation,
    NotFound,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Executor,
    Mapping,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Executor => "executor",
            Self::Mapping => "mapping",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}
