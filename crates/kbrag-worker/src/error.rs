//! Worker error taxonomy, covering the step failures that can occur
//! across one job's pipeline (spec §4.8).

use kbrag_chunker::ChunkError;
use kbrag_coordinator::CoordinatorError;
use kbrag_core::CoreErrorKind;
use kbrag_models::ModelError;
use kbrag_object::StorageError;
use kbrag_parser::ParseError;
use kbrag_postgres::PgError;

pub type WorkerResult<T> = std::result::Result<T, WorkerError>;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("object store error: {0}")]
    Storage(#[from] StorageError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("chunking error: {0}")]
    Chunk(#[from] ChunkError),

    #[error("model gateway error: {0}")]
    Model(#[from] ModelError),

    #[error("metadata store error: {0}")]
    Metadata(#[from] PgError),

    #[error("index coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("document produced zero chunks")]
    EmptyDocument,

    #[error("embedding batch dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl WorkerError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::Storage(err) => err.kind(),
            Self::Parse(err) => err.kind(),
            Self::Chunk(err) => err.kind(),
            Self::Model(err) => err.kind(),
            Self::Metadata(err) => err.kind(),
            Self::Coordinator(err) => err.kind(),
            Self::EmptyDocument => CoreErrorKind::InvalidInput,
            Self::DimensionMismatch { .. } => CoreErrorKind::InvalidInput,
        }
    }
}
