//! Query engine error taxonomy.

use kbrag_core::CoreErrorKind;
use kbrag_coordinator::CoordinatorError;
use kbrag_models::ModelError;
use kbrag_object::StorageError;
use kbrag_postgres::PgError;
use kbrag_vector::VectorError;

pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("knowledge base {kb_id} not found")]
    KbNotFound { kb_id: uuid::Uuid },

    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("query embedding dimension mismatch: kb is {expected}, model returned {actual}")]
    DimensionMismatch { expected: u32, actual: u32 },

    #[error("metadata store error: {0}")]
    Metadata(#[from] PgError),

    #[error("object store error: {0}")]
    Storage(#[from] StorageError),

    #[error("index coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("vector index error: {0}")]
    Vector(#[from] VectorError),

    #[error("model gateway error: {0}")]
    Model(#[from] ModelError),

    #[error("query exceeded its deadline")]
    Timeout,
}

impl QueryError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::KbNotFound { .. } => CoreErrorKind::NotFound,
            Self::InvalidInput(_) | Self::DimensionMismatch { .. } => CoreErrorKind::InvalidInput,
            Self::Metadata(err) => err.kind(),
            Self::Storage(err) => err.kind(),
            Self::Coordinator(err) => err.kind(),
            Self::Vector(_) => CoreErrorKind::Fatal,
            Self::Model(err) => err.kind(),
            Self::Timeout => CoreErrorKind::Timeout,
        }
    }
}
