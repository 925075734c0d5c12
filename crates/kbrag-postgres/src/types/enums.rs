//! Postgres-backed enum types shared with [`kbrag_core::types`].

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use kbrag_core::types::{DocumentStatus as CoreDocumentStatus, IndexStatus as CoreIndexStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, DbEnum, Serialize, Deserialize)]
#[ExistingTypePath = "crate::schema::sql_types::IndexStatus"]
#[DbValueStyle = "snake_case"]
pub enum IndexStatus {
    Empty,
    Processing,
    Ready,
    Error,
}

impl From<CoreIndexStatus> for IndexStatus {
    fn from(value: CoreIndexStatus) -> Self {
        match value {
            CoreIndexStatus::Empty => Self::Empty,
            CoreIndexStatus::Processing => Self::Processing,
            CoreIndexStatus::Ready => Self::Ready,
            CoreIndexStatus::Error => Self::Error,
        }
    }
}

impl From<IndexStatus> for CoreIndexStatus {
    fn from(value: IndexStatus) -> Self {
        match value {
            IndexStatus::Empty => Self::Empty,
            IndexStatus::Processing => Self::Processing,
            IndexStatus::Ready => Self::Ready,
            IndexStatus::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DbEnum, Serialize, Deserialize)]
#[ExistingTypePath = "crate::schema::sql_types::DocumentStatus"]
#[DbValueStyle = "snake_case"]
pub enum DocumentStatus {
    Pending,
    Processing,
    Indexed,
    Failed,
}

impl From<CoreDocumentStatus> for DocumentStatus {
    fn from(value: CoreDocumentStatus) -> Self {
        match value {
            CoreDocumentStatus::Pending => Self::Pending,
            CoreDocumentStatus::Processing => Self::Processing,
            CoreDocumentStatus::Indexed => Self::Indexed,
            CoreDocumentStatus::Failed => Self::Failed,
        }
    }
}

impl From<DocumentStatus> for CoreDocumentStatus {
    fn from(value: DocumentStatus) -> Self {
        match value {
            DocumentStatus::Pending => Self::Pending,
            DocumentStatus::Processing => Self::Processing,
            DocumentStatus::Indexed => Self::Indexed,
            DocumentStatus::Failed => Self::Failed,
        }
    }
}
