//! Chunker error taxonomy.

use kbrag_core::CoreErrorKind;

pub type ChunkResult<T> = std::result::Result<T, ChunkError>;

#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("invalid chunker configuration: {0}")]
    InvalidConfig(String),
}

impl ChunkError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::InvalidConfig(_) => CoreErrorKind::Fatal,
        }
    }
}
