//! Shared backoff helper used by the model gateway (§4.3) and the index
//! coordinator (§4.7), grounded on the retry shape the teacher uses for
//! transient NATS operations.

use std::time::Duration;

use rand::Rng;

/// Linear backoff with jitter: `base * attempt + random(0, jitter)`.
///
/// Used by the index coordinator's conditional-update retry loop (§4.7),
/// which is capped at 5 attempts.
pub fn linear_backoff(base: Duration, jitter: Duration, attempt: u32) -> Duration {
    let linear = base.saturating_mul(attempt.max(1));
    let jitter = if jitter.is_zero() {
        Duration::ZERO
    } else {
        Duration::from_nanos(rand::rng().random_range(0..=jitter.as_nanos() as u64))
    };
    linear + jitter
}

/// Exponential backoff with jitter, used by the model gateway and object
/// store gateway for throttled/transient retries (§4.3, §4.1).
pub fn exponential_backoff(base: Duration, attempt: u32, max: Duration) -> Duration {
    let exp = base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
    let capped = exp.min(max);
    let jitter = Duration::from_nanos(rand::rng().random_range(0..=capped.as_nanos() as u64 / 2));
    capped.min(max) + jitter.min(max.saturating_sub(capped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_backoff_scales_with_attempt() {
        let d1 = linear_backoff(Duration::from_millis(100), Duration::ZERO, 1);
        let d3 = linear_backoff(Duration::from_millis(100), Duration::ZERO, 3);
        assert_eq!(d1, Duration::from_millis(100));
        assert_eq!(d3, Duration::from_millis(300));
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let d = exponential_backoff(Duration::from_millis(100), 20, Duration::from_secs(5));
        assert!(d <= Duration::from_secs(5) + Duration::from_secs(5) / 2);
    }
}
