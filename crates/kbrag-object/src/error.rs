//! Object store error taxonomy (spec §4.1, §7).

use kbrag_core::CoreErrorKind;
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    /// A precondition-protected put lost its race (spec §4.1).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transient storage failure: {0}")]
    Transient(String),

    #[error("fatal storage error: {0}")]
    Fatal(String),
}

impl StorageError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::NotFound(_) => CoreErrorKind::NotFound,
            Self::Conflict(_) => CoreErrorKind::PreconditionFailed,
            Self::Transient(_) => CoreErrorKind::Transient,
            Self::Fatal(_) => CoreErrorKind::Fatal,
        }
    }

    /// Whether this error is eligible for the gateway's single idempotent
    /// retry on reads (spec §4.1: "no retries... beyond one idempotent
    /// retry for Transient read errors").
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::ConditionNotMatch | ErrorKind::AlreadyExists => {
                Self::Conflict(err.to_string())
            }
            ErrorKind::RateLimited | ErrorKind::Unexpected if err.is_temporary() => {
                Self::Transient(err.to_string())
            }
            _ if err.is_temporary() => Self::Transient(err.to_string()),
            _ => Self::Fatal(err.to_string()),
        }
    }
}
