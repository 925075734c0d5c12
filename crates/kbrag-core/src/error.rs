//! Cross-cutting error taxonomy (spec §7).
//!
//! Every component-level error type in this workspace maps into a
//! [`CoreErrorKind`] via a `kind()` method so that a caller at the system
//! boundary can classify failures without matching on crate-specific
//! variants.

use serde::{Deserialize, Serialize};

/// Stable, transport-neutral error classification shared by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreErrorKind {
    /// Missing KB, document, chunk, or blob.
    NotFound,
    /// A conditional write lost its race; recovered locally unless the
    /// retry budget is exhausted (see [`CoreErrorKind::ConcurrencyExhausted`]).
    PreconditionFailed,
    /// Bad request, dimension mismatch, unsupported format, empty document.
    InvalidInput,
    /// Rate limited; recovered locally via backoff.
    Throttled,
    /// Transient I/O failure; recovered locally via backoff.
    Transient,
    /// The coordinator exhausted its optimistic-locking retry budget.
    ConcurrencyExhausted,
    /// The embedding/generation model is unavailable after retry budget.
    ModelUnavailable,
    /// A torn index read that survived one in-band reload.
    IndexUnavailable,
    /// Unexpected internal error.
    Fatal,
    /// Request or job deadline exceeded.
    Timeout,
}

impl CoreErrorKind {
    /// Whether this kind of failure is expected to resolve on its own if
    /// retried by the caller (as opposed to being recovered internally by
    /// the component that produced it).
    pub fn is_caller_retryable(self) -> bool {
        matches!(self, Self::Throttled | Self::Transient | Self::Timeout)
    }
}

/// Truncates an error message to a safe length before it is persisted on a
/// `Document` row, per spec §7 (`Fatal` errors are truncated).
pub fn truncate_error_message(msg: &str) -> String {
    const MAX_LEN: usize = 2000;
    if msg.len() <= MAX_LEN {
        msg.to_string()
    } else {
        let mut end = MAX_LEN;
        while !msg.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}… (truncated)", &msg[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_messages() {
        let long = "x".repeat(3000);
        let truncated = truncate_error_message(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.ends_with("(truncated)"));
    }

    #[test]
    fn leaves_short_messages_alone() {
        assert_eq!(truncate_error_message("short"), "short");
    }

    #[test]
    fn caller_retryable_classification() {
        assert!(CoreErrorKind::Throttled.is_caller_retryable());
        assert!(!CoreErrorKind::NotFound.is_caller_retryable());
        assert!(!CoreErrorKind::ConcurrencyExhausted.is_caller_retryable());
    }
}
