//! Document record (spec §3 "Document").

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a document. Transitions only along
/// `Pending -> Processing -> {Indexed, Failed}` (spec §3 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Indexed,
    Failed,
}

impl DocumentStatus {
    /// Whether `self -> next` is a legal transition under spec §3.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Indexed)
                | (Self::Processing, Self::Failed)
        )
    }

    /// Whether this status counts towards a KB being "in flight" for
    /// `indexStatus` derivation (spec §4.10).
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

/// A single uploaded document within a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub kb_id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub object_key: String,
    pub status: DocumentStatus,
    pub uploaded_at: Timestamp,
    pub indexed_at: Option<Timestamp>,
    pub error_message: Option<String>,
    pub chunk_count: Option<u32>,
    pub extraction_method: Option<String>,
}

impl Document {
    /// Creates a new `pending` document row (C10 `confirmUpload`).
    pub fn new_pending(
        kb_id: Uuid,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        object_key: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            kb_id,
            document_id: Uuid::new_v4(),
            filename: filename.into(),
            content_type: content_type.into(),
            size,
            object_key: object_key.into(),
            status: DocumentStatus::Pending,
            uploaded_at: Timestamp::now(),
            indexed_at: None,
            error_message: None,
            chunk_count: None,
            extraction_method: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        assert!(DocumentStatus::Pending.can_transition_to(DocumentStatus::Processing));
        assert!(DocumentStatus::Processing.can_transition_to(DocumentStatus::Indexed));
        assert!(DocumentStatus::Processing.can_transition_to(DocumentStatus::Failed));
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        assert!(!DocumentStatus::Indexed.can_transition_to(DocumentStatus::Processing));
        assert!(!DocumentStatus::Failed.can_transition_to(DocumentStatus::Pending));
        assert!(!DocumentStatus::Pending.can_transition_to(DocumentStatus::Indexed));
    }

    #[test]
    fn in_flight_classification() {
        assert!(DocumentStatus::Pending.is_in_flight());
        assert!(DocumentStatus::Processing.is_in_flight());
        assert!(!DocumentStatus::Indexed.is_in_flight());
        assert!(!DocumentStatus::Failed.is_in_flight());
    }
}
