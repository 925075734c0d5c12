//! Vector index error taxonomy, mirroring the shape of
//! `nvisy-vector::error::VectorError`.

use kbrag_core::CoreErrorKind;
use thiserror::Error;

pub type VectorResult<T> = Result<T, VectorError>;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("dimension mismatch: index is {expected}-dimensional, got {actual}")]
    DimensionMismatch { expected: u32, actual: u32 },

    #[error("duplicate vector id: {0}")]
    DuplicateVectorId(uuid::Uuid),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt index payload: {0}")]
    Corrupt(String),
}

impl VectorError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::DimensionMismatch { .. } | Self::DuplicateVectorId(_) => {
                CoreErrorKind::InvalidInput
            }
            Self::Serialization(_) | Self::Corrupt(_) => CoreErrorKind::Fatal,
        }
    }
}
