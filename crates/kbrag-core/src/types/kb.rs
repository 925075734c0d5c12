//! Knowledge base record (spec §3 "KnowledgeBase").

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Index readiness of a knowledge base's vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    /// No document has ever been indexed.
    Empty,
    /// At least one document is `pending` or `processing`.
    Processing,
    /// At least one document is indexed and none are `pending`/`processing`.
    Ready,
    /// The coordinator exhausted its retry budget without any document ever
    /// reaching `indexed`. Clearable by a subsequent successful indexing
    /// (see `DESIGN.md`, open question on `error` semantics).
    Error,
}

/// A knowledge base: a named collection of documents and its vector index,
/// owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub owner_id: Uuid,
    pub kb_id: Uuid,
    pub name: String,
    pub description: String,
    pub embedding_model: String,
    pub generation_model: String,
    pub document_count: u32,
    pub total_size: u64,
    pub index_status: IndexStatus,
    /// Opaque optimistic-concurrency token. Incremented by every successful
    /// conditional update (§4.7 step 7).
    pub version: u64,
    /// Set on first successful indexing; immutable thereafter (§3 invariant).
    pub dimension: Option<u32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl KnowledgeBase {
    /// Creates a freshly allocated KB row (C10 `createKB`).
    pub fn new(
        owner_id: Uuid,
        name: impl Into<String>,
        description: impl Into<String>,
        embedding_model: impl Into<String>,
        generation_model: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            owner_id,
            kb_id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            embedding_model: embedding_model.into(),
            generation_model: generation_model.into(),
            document_count: 0,
            total_size: 0,
            index_status: IndexStatus::Empty,
            version: 0,
            dimension: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recomputes `index_status` from the documents currently in flight,
    /// per the state machine in spec §4.10.
    pub fn derive_index_status(document_count: u32, any_in_flight: bool) -> IndexStatus {
        match (document_count, any_in_flight) {
            (_, true) => IndexStatus::Processing,
            (0, false) => IndexStatus::Empty,
            (_, false) => IndexStatus::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_kb_starts_empty_and_unversioned() {
        let kb = KnowledgeBase::new(Uuid::new_v4(), "kb", "desc", "text-embed-3", "gpt-5");
        assert_eq!(kb.version, 0);
        assert_eq!(kb.document_count, 0);
        assert!(kb.dimension.is_none());
        assert_eq!(kb.index_status, IndexStatus::Empty);
    }

    #[test]
    fn derive_index_status_prefers_in_flight() {
        assert_eq!(
            KnowledgeBase::derive_index_status(5, true),
            IndexStatus::Processing
        );
        assert_eq!(
            KnowledgeBase::derive_index_status(0, false),
            IndexStatus::Empty
        );
        assert_eq!(
            KnowledgeBase::derive_index_status(2, false),
            IndexStatus::Ready
        );
    }
}
