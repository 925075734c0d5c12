//! Lifecycle error taxonomy.

use kbrag_core::CoreErrorKind;
use kbrag_coordinator::CoordinatorError;
use kbrag_object::StorageError;
use kbrag_postgres::PgError;
use kbrag_queue::QueueError;
use uuid::Uuid;

pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("knowledge base {kb_id} not found")]
    KbNotFound { kb_id: Uuid },

    #[error("document {document_id} not found in knowledge base {kb_id}")]
    DocumentNotFound { kb_id: Uuid, document_id: Uuid },

    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("metadata store error: {0}")]
    Metadata(#[from] PgError),

    #[error("object store error: {0}")]
    Storage(#[from] StorageError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("index coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),
}

impl LifecycleError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::KbNotFound { .. } | Self::DocumentNotFound { .. } => CoreErrorKind::NotFound,
            Self::InvalidInput(_) => CoreErrorKind::InvalidInput,
            Self::Metadata(err) => err.kind(),
            Self::Storage(err) => err.kind(),
            Self::Queue(err) => err.kind(),
            Self::Coordinator(err) => err.kind(),
        }
    }
}
