//! Polling loop: pulls batches off the queue and runs each job through the
//! pipeline, acking or nak-ing based on the outcome (spec §4.8, §5
//! "Suspension/blocking points").

use std::sync::Arc;

use kbrag_queue::IndexingJobSubscriber;
use tracing::{error, info, warn};

use crate::config::WorkerConfig;
use crate::context::WorkerContext;
use crate::pipeline::{process_job, JobOutcome};
use crate::TRACING_TARGET;

/// Runs the indexing worker loop forever, pulling jobs from `subscriber`
/// and processing them against `ctx`. Returns only if the queue itself
/// becomes unavailable.
pub async fn run(
    ctx: Arc<WorkerContext>,
    subscriber: IndexingJobSubscriber,
    config: WorkerConfig,
) -> kbrag_queue::QueueResult<()> {
    loop {
        let batch = subscriber.fetch_batch(config.fetch_batch_size).await?;
        if batch.is_empty() {
            tokio::time::sleep(config.poll_interval).await;
            continue;
        }

        for message in batch {
            let outcome =
                tokio::time::timeout(config.job_deadline, process_job(&ctx, &message.job)).await;

            match outcome {
                Ok(Ok(JobOutcome::Indexed { chunk_count })) => {
                    info!(target: TRACING_TARGET, chunk_count, "job indexed");
                    if let Err(err) = message.ack().await {
                        warn!(target: TRACING_TARGET, error = %err, "failed to ack indexed job");
                    }
                }
                Ok(Ok(JobOutcome::Skipped)) => {
                    if let Err(err) = message.ack().await {
                        warn!(target: TRACING_TARGET, error = %err, "failed to ack skipped job");
                    }
                }
                Ok(Ok(JobOutcome::Failed { reason })) => {
                    warn!(target: TRACING_TARGET, reason = %reason, "job failed, acking (document marked failed)");
                    if let Err(err) = message.ack().await {
                        warn!(target: TRACING_TARGET, error = %err, "failed to ack failed job");
                    }
                }
                Ok(Err(err)) => {
                    error!(target: TRACING_TARGET, error = %err, delivery_count = message.delivery_count, "job errored before a terminal document state was reached, requesting redelivery");
                    if let Err(err) = message.nak(config.nak_delay).await {
                        warn!(target: TRACING_TARGET, error = %err, "failed to nak errored job");
                    }
                }
                Err(_elapsed) => {
                    error!(target: TRACING_TARGET, delivery_count = message.delivery_count, "job exceeded its deadline, requesting redelivery");
                    if let Err(err) = message.nak(config.nak_delay).await {
                        warn!(target: TRACING_TARGET, error = %err, "failed to nak timed-out job");
                    }
                }
            }
        }
    }
}
