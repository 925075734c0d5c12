//! Coordinator error taxonomy.

use kbrag_core::CoreErrorKind;
use kbrag_object::StorageError;
use kbrag_postgres::PgError;
use kbrag_vector::VectorError;

pub type CoordinatorResult<T> = std::result::Result<T, CoordinatorError>;

#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("knowledge base {kb_id} not found")]
    KbNotFound { kb_id: uuid::Uuid },

    #[error("vector dimension mismatch: index is {expected}, batch is {actual}")]
    DimensionMismatch { expected: u32, actual: u32 },

    #[error("object store error: {0}")]
    Storage(#[from] StorageError),

    #[error("vector index error: {0}")]
    Vector(#[from] VectorError),

    #[error("metadata store error: {0}")]
    Metadata(#[from] PgError),

    /// The retry budget (5 attempts, spec §4.7) was exhausted without a
    /// winning conditional update.
    #[error("exhausted {attempts} merge attempts for knowledge base {kb_id}")]
    ConcurrencyExhausted { kb_id: uuid::Uuid, attempts: u32 },

    /// A search hit a torn blob/descriptor pair that survived one reload.
    #[error("vector index for knowledge base {kb_id} is unavailable")]
    IndexUnavailable { kb_id: uuid::Uuid },
}

impl CoordinatorError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::KbNotFound { .. } => CoreErrorKind::NotFound,
            Self::DimensionMismatch { .. } => CoreErrorKind::InvalidInput,
            Self::Storage(err) => err.kind(),
            Self::Vector(_) => CoreErrorKind::Fatal,
            Self::Metadata(err) => err.kind(),
            Self::ConcurrencyExhausted { .. } => CoreErrorKind::ConcurrencyExhausted,
            Self::IndexUnavailable { .. } => CoreErrorKind::IndexUnavailable,
        }
    }
}
