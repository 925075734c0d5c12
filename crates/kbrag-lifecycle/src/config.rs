//! Lifecycle tuning (spec §4.10 `presignUpload`).

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct LifecycleConfig {
    /// How long a presigned upload URL remains valid.
    pub presign_ttl: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            presign_ttl: Duration::from_secs(15 * 60),
        }
    }
}
