//! Indexing job stream: a JetStream work queue carrying [`IndexingJob`]
//! messages from the lifecycle/coordinator side to indexing workers.

use async_nats::jetstream::{self, stream};
use futures::StreamExt;
use kbrag_core::types::IndexingJob;
use tracing::{debug, instrument, warn};

use crate::client::QueueClient;
use crate::error::{QueueError, QueueResult};
use crate::{TRACING_TARGET_PUBLISH, TRACING_TARGET_SUBSCRIBE};

const STREAM_NAME: &str = "INDEXING_JOBS";
const SUBJECT: &str = "indexing.jobs";

async fn get_or_create_stream(
    jetstream: &jetstream::Context,
    ack_wait: std::time::Duration,
) -> QueueResult<jetstream::stream::Stream> {
    let config = stream::Config {
        name: STREAM_NAME.to_string(),
        description: Some("Pending and in-flight document indexing jobs".to_string()),
        subjects: vec![format!("{SUBJECT}.>")],
        retention: stream::RetentionPolicy::WorkQueue,
        ..Default::default()
    };

    match jetstream.get_stream(STREAM_NAME).await {
        Ok(existing) => Ok(existing),
        Err(_) => jetstream
            .create_stream(config)
            .await
            .map_err(|err| QueueError::stream(STREAM_NAME, err)),
    }
    .map(|stream| {
        let _ = ack_wait;
        stream
    })
}

/// Publishes indexing jobs onto the work queue.
#[derive(Debug, Clone)]
pub struct IndexingJobPublisher {
    jetstream: jetstream::Context,
}

impl IndexingJobPublisher {
    #[instrument(skip(client), target = TRACING_TARGET_PUBLISH)]
    pub async fn new(client: &QueueClient) -> QueueResult<Self> {
        get_or_create_stream(client.jetstream(), client.config().ack_wait()).await?;
        Ok(Self {
            jetstream: client.jetstream().clone(),
        })
    }

    /// Publishes a job and waits for the broker's JetStream ack, so a
    /// successful return means the job is durably enqueued.
    #[instrument(skip(self, job), target = TRACING_TARGET_PUBLISH, fields(kb_id = %job.kb_id, document_id = %job.document_id))]
    pub async fn publish(&self, job: &IndexingJob) -> QueueResult<()> {
        let subject = format!("{SUBJECT}.{}", job.kb_id);
        let payload = serde_json::to_vec(job)?;

        self.jetstream
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|err| QueueError::publish(&subject, err))?
            .await
            .map_err(|err| QueueError::publish(&subject, err))?;

        debug!(target: TRACING_TARGET_PUBLISH, subject = %subject, "published indexing job");
        Ok(())
    }
}

/// A delivered indexing job, together with the handle needed to ack it.
pub struct IndexingJobMessage {
    pub job: IndexingJob,
    pub delivery_count: u64,
    message: jetstream::Message,
}

impl IndexingJobMessage {
    /// Acknowledges successful (or permanently failed) processing; the job
    /// will not be redelivered.
    pub async fn ack(&self) -> QueueResult<()> {
        self.message
            .ack()
            .await
            .map_err(|err| QueueError::Ack(err.to_string()))
    }

    /// Negatively acknowledges the job, asking the broker to redeliver it
    /// after `delay`.
    pub async fn nak(&self, delay: std::time::Duration) -> QueueResult<()> {
        self.message
            .ack_with(jetstream::AckKind::Nak(Some(delay)))
            .await
            .map_err(|err| QueueError::Ack(err.to_string()))
    }
}

/// Pulls indexing jobs off the work queue for a single worker.
pub struct IndexingJobSubscriber {
    consumer: jetstream::consumer::PullConsumer,
}

impl IndexingJobSubscriber {
    #[instrument(skip(client), target = TRACING_TARGET_SUBSCRIBE)]
    pub async fn new(client: &QueueClient, consumer_name: &str) -> QueueResult<Self> {
        let stream = get_or_create_stream(client.jetstream(), client.config().ack_wait()).await?;

        let consumer_config = jetstream::consumer::pull::Config {
            name: Some(consumer_name.to_string()),
            durable_name: Some(consumer_name.to_string()),
            description: Some(format!("Indexing worker consumer {consumer_name}")),
            ack_wait: client.config().ack_wait(),
            max_deliver: client.config().max_deliver(),
            ..Default::default()
        };

        let consumer = stream
            .create_consumer(consumer_config)
            .await
            .map_err(|err| QueueError::consumer(consumer_name, err))?;

        debug!(
            target: TRACING_TARGET_SUBSCRIBE,
            consumer = consumer_name,
            "created indexing job consumer"
        );
        Ok(Self { consumer })
    }

    /// Pulls up to `max_messages` jobs. Messages that fail to deserialize
    /// are acked immediately (poison messages must not block the queue)
    /// and are skipped from the returned batch.
    #[instrument(skip(self), target = TRACING_TARGET_SUBSCRIBE)]
    pub async fn fetch_batch(&self, max_messages: usize) -> QueueResult<Vec<IndexingJobMessage>> {
        let mut messages = self
            .consumer
            .fetch()
            .max_messages(max_messages)
            .messages()
            .await
            .map_err(|err| QueueError::consumer("indexing-worker", err))?;

        let mut batch = Vec::with_capacity(max_messages);
        while let Some(next) = messages.next().await {
            let message = match next {
                Ok(message) => message,
                Err(err) => {
                    warn!(target: TRACING_TARGET_SUBSCRIBE, error = %err, "message fetch error");
                    continue;
                }
            };

            let info = message.info().map_err(|err| QueueError::consumer("indexing-worker", err))?;
            let delivery_count = info.delivered;

            match serde_json::from_slice::<IndexingJob>(&message.payload) {
                Ok(job) => batch.push(IndexingJobMessage {
                    job,
                    delivery_count,
                    message,
                }),
                Err(err) => {
                    warn!(
                        target: TRACING_TARGET_SUBSCRIBE,
                        error = %err,
                        "dropping undeserializable indexing job"
                    );
                    message
                        .ack()
                        .await
                        .map_err(|err| QueueError::Ack(err.to_string()))?;
                }
            }
        }

        Ok(batch)
    }
}
