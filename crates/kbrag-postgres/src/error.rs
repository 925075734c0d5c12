//! Error types for the metadata store gateway, mirroring the shape of
//! `nvisy-postgres::error`.

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::result::{ConnectionError, Error as DieselError};
use diesel_async::pooled_connection::PoolError as DieselPoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;
use kbrag_core::CoreErrorKind;

use crate::types::ConstraintViolation;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database operation timed out")]
    Timeout(TimeoutType),

    #[error("database connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("database migration error: {0}")]
    Migration(BoxError),

    #[error("row not found")]
    NotFound,

    /// Raised when a conditional update's `WHERE version = ...` clause
    /// matched zero rows (spec §4.7 step 4, "compare-and-swap").
    #[error("precondition failed: expected version {expected}, row has moved on")]
    VersionConflict { expected: u64 },

    #[error("database query error: {0}")]
    Query(#[from] DieselError),

    #[error("unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(err) = self else {
            return None;
        };
        let DieselError::DatabaseError(_, info) = err else {
            return None;
        };
        info.constraint_name()
    }

    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_) | PgError::Connection(ConnectionError::BadConnection(_))
        )
    }

    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::NotFound => CoreErrorKind::NotFound,
            Self::VersionConflict { .. } => CoreErrorKind::PreconditionFailed,
            Self::Config(_) => CoreErrorKind::InvalidInput,
            Self::Timeout(_) => CoreErrorKind::Timeout,
            Self::Connection(_) => CoreErrorKind::Transient,
            Self::Migration(_) | Self::Unexpected(_) => CoreErrorKind::Fatal,
            Self::Query(err) => {
                if self.constraint_violation().is_some() {
                    CoreErrorKind::InvalidInput
                } else {
                    match err {
                        DieselError::NotFound => CoreErrorKind::NotFound,
                        _ => CoreErrorKind::Fatal,
                    }
                }
            }
        }
    }
}

impl From<DeadpoolError> for PgError {
    fn from(value: DeadpoolError) -> Self {
        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                tracing::warn!("unexpected post-create hook error: {err}");
                Self::Unexpected(err.to_string().into())
            }
            DeadpoolError::NoRuntimeSpecified => {
                Self::Unexpected("no runtime specified".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "connection pool is closed".into(),
            )),
        }
    }
}

pub type PgResult<T, E = PgError> = Result<T, E>;
