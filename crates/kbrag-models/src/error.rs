//! Error taxonomy for the model gateway (spec §4.3, §7).

use kbrag_core::CoreErrorKind;

pub type ModelResult<T, E = ModelError> = std::result::Result<T, E>;

/// Errors surfaced by `embed`/`generate`, matching the failure taxonomy
/// every gateway method in the spec commits to: `ModelUnavailable`,
/// `InvalidInput`, `Throttled`, `Fatal`.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model '{model_id}' is not registered with the gateway")]
    UnknownModel { model_id: String },

    #[error("{provider} is unavailable after retrying: {reason}")]
    Unavailable { provider: String, reason: String },

    #[error("invalid request to {provider}: {reason}")]
    InvalidInput { provider: String, reason: String },

    #[error("{provider} rate limited the request")]
    Throttled { provider: String },

    #[error("{provider} request failed: {reason}")]
    Fatal { provider: String, reason: String },
}

impl ModelError {
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::UnknownModel { .. } | Self::InvalidInput { .. } => CoreErrorKind::InvalidInput,
            Self::Unavailable { .. } => CoreErrorKind::ModelUnavailable,
            Self::Throttled { .. } => CoreErrorKind::Throttled,
            Self::Fatal { .. } => CoreErrorKind::Fatal,
        }
    }
}
