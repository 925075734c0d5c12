#![forbid(unsafe_code)]
//! Indexing job queue transport: a JetStream work queue carrying
//! [`kbrag_core::types::IndexingJob`] messages from the lifecycle/
//! coordinator side to indexing workers, grounded on `nvisy-nats`.

mod client;
mod config;
mod error;
mod stream;

pub use client::QueueClient;
pub use config::QueueConfig;
pub use error::{QueueError, QueueResult};
pub use stream::{IndexingJobMessage, IndexingJobPublisher, IndexingJobSubscriber};

pub const TRACING_TARGET_CLIENT: &str = "kbrag_queue::client";
pub const TRACING_TARGET_PUBLISH: &str = "kbrag_queue::publish";
pub const TRACING_TARGET_SUBSCRIBE: &str = "kbrag_queue::subscribe";
