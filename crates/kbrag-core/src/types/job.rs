//! Indexing job message (spec §6 "Queue message").

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The message delivered by the queue to trigger document indexing.
///
/// Delivery is at-least-once; a worker must treat re-delivery of the same
/// job as idempotent (spec §4.8 step 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingJob {
    pub kb_id: Uuid,
    pub document_id: Uuid,
    pub owner_id: Uuid,
    pub object_key: String,
    pub filename: String,
    pub embedding_model: String,
}
