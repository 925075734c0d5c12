//! Maps third-party provider errors onto the gateway's failure taxonomy.
//!
//! Rig's provider errors don't expose a stable "is this retryable" signal
//! across backends, so classification falls back to matching the error's
//! rendered message against the phrasing providers use for rate limiting
//! and outages.

use crate::error::ModelError;

pub(crate) fn classify(provider: &str, err: impl std::fmt::Display) -> ModelError {
    let message = err.to_string();
    let lower = message.to_lowercase();

    if lower.contains("rate limit") || lower.contains("429") || lower.contains("too many requests")
    {
        return ModelError::Throttled {
            provider: provider.to_string(),
        };
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("503")
        || lower.contains("502")
        || lower.contains("unavailable")
    {
        return ModelError::Unavailable {
            provider: provider.to_string(),
            reason: message,
        };
    }

    if lower.contains("invalid") || lower.contains("bad request") || lower.contains("400") {
        return ModelError::InvalidInput {
            provider: provider.to_string(),
            reason: message,
        };
    }

    ModelError::Fatal {
        provider: provider.to_string(),
        reason: message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_phrasing_is_throttled() {
        let err = classify("openai", "429 Too Many Requests");
        assert!(matches!(err, ModelError::Throttled { .. }));
    }

    #[test]
    fn connection_phrasing_is_unavailable() {
        let err = classify("ollama", "connection refused");
        assert!(matches!(err, ModelError::Unavailable { .. }));
    }

    #[test]
    fn unrecognized_phrasing_is_fatal() {
        let err = classify("openai", "something exploded");
        assert!(matches!(err, ModelError::Fatal { .. }));
    }
}
