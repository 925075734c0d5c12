//! Worker tuning knobs (spec §5 "Suspension/blocking points").

use std::time::Duration;

/// Per-job and polling configuration for the indexing worker.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Wall-clock deadline for one job, measured from dequeue (spec §5
    /// "Cancellation and timeouts"). Must stay below the queue's ack_wait.
    pub job_deadline: Duration,
    /// Jobs pulled per `fetch_batch` call.
    pub fetch_batch_size: usize,
    /// Sleep between empty fetches.
    pub poll_interval: Duration,
    /// Delay before a transient job failure is redelivered.
    pub nak_delay: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            job_deadline: Duration::from_secs(120),
            fetch_batch_size: 4,
            poll_interval: Duration::from_secs(2),
            nak_delay: Duration::from_secs(5),
        }
    }
}
