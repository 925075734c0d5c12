//! Error types for the indexing job queue.

use std::time::Duration;

use kbrag_core::CoreErrorKind;

pub type QueueResult<T, E = QueueError> = std::result::Result<T, E>;

/// Errors produced while publishing or consuming indexing jobs.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("NATS connection error: {0}")]
    Connection(#[source] async_nats::Error),

    #[error("operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("stream operation failed on '{stream}': {reason}")]
    Stream { stream: String, reason: String },

    #[error("consumer '{consumer}' error: {reason}")]
    Consumer { consumer: String, reason: String },

    #[error("failed to publish job to subject '{subject}': {reason}")]
    Publish { subject: String, reason: String },

    #[error("failed to acknowledge message: {0}")]
    Ack(String),

    #[error("job payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid queue configuration: {0}")]
    Config(String),
}

impl QueueError {
    pub fn stream(stream: impl Into<String>, reason: impl ToString) -> Self {
        Self::Stream {
            stream: stream.into(),
            reason: reason.to_string(),
        }
    }

    pub fn consumer(consumer: impl Into<String>, reason: impl ToString) -> Self {
        Self::Consumer {
            consumer: consumer.into(),
            reason: reason.to_string(),
        }
    }

    pub fn publish(subject: impl Into<String>, reason: impl ToString) -> Self {
        Self::Publish {
            subject: subject.into(),
            reason: reason.to_string(),
        }
    }

    /// Maps this error onto the cross-cutting classification shared by
    /// every component in the workspace.
    pub fn kind(&self) -> CoreErrorKind {
        match self {
            Self::Timeout { .. } => CoreErrorKind::Timeout,
            Self::Config(_) | Self::Serialization(_) => CoreErrorKind::InvalidInput,
            Self::Connection(_) | Self::Stream { .. } | Self::Consumer { .. } => {
                CoreErrorKind::Transient
            }
            Self::Publish { .. } | Self::Ack(_) => CoreErrorKind::Transient,
        }
    }
}
