//! Parser error taxonomy (spec §4.4).

use kbrag_core::CoreErrorKind;

pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported format: content_type='{content_type}', filename='{filename}'")]
    UnsupportedFormat { content_type: String, filename: String },

    #[error("corrupt input: {0}")]
    CorruptInput(String),

    #[error("document produced no extractable text")]
    EmptyDocument,

    #[error("parser I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::UnsupportedFormat { .. } | Self::EmptyDocument => CoreErrorKind::InvalidInput,
            Self::CorruptInput(_) => CoreErrorKind::InvalidInput,
            Self::Io(_) => CoreErrorKind::Fatal,
        }
    }
}
