//! The index coordinator's optimistic-concurrency merge protocol (C7,
//! spec §4.7): up to 5 attempts of read-validate-load-merge-serialize-write,
//! guarded by a conditional update on the KB row's `version`.

use std::time::Duration;

use kbrag_core::retry::linear_backoff;
use kbrag_core::types::IndexStatus as CoreIndexStatus;
use kbrag_object::ObjectStoreGateway;
use kbrag_postgres::model::UpdateKnowledgeBaseRow;
use kbrag_postgres::query::{DocumentRepository, KnowledgeBaseRepository};
use kbrag_postgres::{PgClient, PgError};
use uuid::Uuid;

use crate::blob;
use crate::error::{CoordinatorError, CoordinatorResult};

const MAX_ATTEMPTS: u32 = 5;
const BACKOFF_BASE: Duration = Duration::from_millis(50);
const BACKOFF_JITTER: Duration = Duration::from_millis(25);

/// What a merge attempt does to the in-memory index once it is loaded:
/// either append a document's vectors, or drop a document's vectors.
pub enum MergeOp<'a> {
    Append {
        vectors: Vec<Vec<f32>>,
        vector_ids: Vec<Uuid>,
    },
    Remove {
        vector_ids: &'a [Uuid],
    },
}

/// Coordinates merges and removals into a single KB's vector index,
/// serializing concurrent workers via the KB row's `version` token.
pub struct IndexCoordinator {
    pg: PgClient,
    objects: ObjectStoreGateway,
}

impl IndexCoordinator {
    pub fn new(pg: PgClient, objects: ObjectStoreGateway) -> Self {
        Self { pg, objects }
    }

    /// Merges a document's vectors into `kb_id`'s index (spec §4.7 steps 1-7).
    #[tracing::instrument(skip(self, vectors, vector_ids), fields(kb_id = %kb_id, owner_id = %owner_id, incoming = vectors.len()))]
    pub async fn merge_document(
        &self,
        owner_id: Uuid,
        kb_id: Uuid,
        vectors: Vec<Vec<f32>>,
        vector_ids: Vec<Uuid>,
        document_size: u64,
    ) -> CoordinatorResult<()> {
        self.run_protocol(
            owner_id,
            kb_id,
            document_size as i64,
            MergeOp::Append {
                vectors,
                vector_ids,
            },
        )
        .await
    }

    /// Removes a document's vectors from `kb_id`'s index (spec §4.7
    /// "Removal path").
    #[tracing::instrument(skip(self, vector_ids), fields(kb_id = %kb_id, owner_id = %owner_id))]
    pub async fn remove_document(
        &self,
        owner_id: Uuid,
        kb_id: Uuid,
        vector_ids: &[Uuid],
        document_size_delta: i64,
    ) -> CoordinatorResult<()> {
        self.run_protocol(
            owner_id,
            kb_id,
            -document_size_delta,
            MergeOp::Remove { vector_ids },
        )
        .await
    }

    async fn run_protocol(
        &self,
        owner_id: Uuid,
        kb_id: Uuid,
        total_size_delta: i64,
        op: MergeOp<'_>,
    ) -> CoordinatorResult<()> {
        for attempt in 1..=MAX_ATTEMPTS {
            match self
                .attempt_once(owner_id, kb_id, total_size_delta, &op)
                .await
            {
                Ok(()) => return Ok(()),
                Err(CoordinatorError::Metadata(PgError::VersionConflict { .. })) => {
                    tracing::warn!(
                        target: crate::TRACING_TARGET,
                        kb_id = %kb_id,
                        attempt,
                        "lost optimistic-concurrency race, retrying"
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(linear_backoff(BACKOFF_BASE, BACKOFF_JITTER, attempt))
                            .await;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        tracing::error!(target: crate::TRACING_TARGET, kb_id = %kb_id, "exhausted merge retry budget");
        self.mark_error_if_never_indexed(owner_id, kb_id).await;
        Err(CoordinatorError::ConcurrencyExhausted {
            kb_id,
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Best-effort: flips `indexStatus` to `error` once retry exhaustion
    /// occurs, but only if no document in this KB has ever reached
    /// `indexed` (spec §4.10: "`error` if the coordinator exhausts retries
    /// without any document ever reaching `indexed`"). A concurrent
    /// version bump losing this race is harmless; the KB's status is
    /// revisited by the next successful merge regardless.
    async fn mark_error_if_never_indexed(&self, owner_id: Uuid, kb_id: Uuid) {
        let Ok(mut conn) = self.pg.get_connection().await else {
            return;
        };
        let Ok(true) = DocumentRepository::any_indexed(&mut conn, kb_id)
            .await
            .map(|any| !any)
        else {
            return;
        };
        let Ok(Some(kb)) = KnowledgeBaseRepository::find_by_id(&mut conn, owner_id, kb_id).await
        else {
            return;
        };

        let changes = UpdateKnowledgeBaseRow {
            index_status: Some(kbrag_postgres::types::IndexStatus::Error),
            ..Default::default()
        };
        if let Err(err) =
            KnowledgeBaseRepository::conditional_update(&mut conn, owner_id, kb_id, kb.version as u64, changes)
                .await
        {
            tracing::warn!(target: crate::TRACING_TARGET, kb_id = %kb_id, %err, "failed to mark knowledge base as errored");
        }
    }

    async fn attempt_once(
        &self,
        owner_id: Uuid,
        kb_id: Uuid,
        total_size_delta: i64,
        op: &MergeOp<'_>,
    ) -> CoordinatorResult<()> {
        let mut conn = self.pg.get_connection().await?;

        // Step 1: read the KB row, capturing version and dimension.
        let kb = KnowledgeBaseRepository::find_by_id(&mut conn, owner_id, kb_id)
            .await?
            .ok_or(CoordinatorError::KbNotFound { kb_id })?;

        // Step 2: validate incoming dimension against the KB's recorded one.
        let incoming_dimension = match op {
            MergeOp::Append { vectors, .. } => vectors.first().map(|v| v.len() as u32),
            MergeOp::Remove { .. } => None,
        };
        let dimension = match (kb.dimension, incoming_dimension) {
            (Some(d), Some(incoming)) if d as u32 != incoming => {
                return Err(CoordinatorError::DimensionMismatch {
                    expected: d as u32,
                    actual: incoming,
                });
            }
            (Some(d), _) => d as u32,
            (None, Some(incoming)) => incoming,
            (None, None) => 0,
        };

        // Step 3: load the current index (or start empty).
        let mut index = blob::load_or_empty(&self.objects, kb_id, dimension).await?;

        // Step 4: merge.
        match op {
            MergeOp::Append {
                vectors,
                vector_ids,
            } => {
                index.add(vectors.clone(), vector_ids.clone())?;
            }
            MergeOp::Remove { vector_ids } => {
                index.remove_by_ids(vector_ids);
            }
        }

        // Steps 5-6: serialize and write blob + descriptor.
        let next_version = kb.version as u64 + 1;
        blob::write_merged(&self.objects, kb_id, &index, next_version).await?;

        // Step 7: conditionally update the KB row, guarded by version == v0.
        let document_count_delta = match op {
            MergeOp::Append { .. } => 1,
            MergeOp::Remove { .. } => -1,
        };
        let new_document_count = (kb.document_count + document_count_delta).max(0);
        let in_flight = DocumentRepository::count_in_flight(&mut conn, kb_id).await? > 0;
        let core_status = if in_flight {
            CoreIndexStatus::Processing
        } else if new_document_count == 0 {
            CoreIndexStatus::Empty
        } else {
            CoreIndexStatus::Ready
        };
        let index_status: kbrag_postgres::types::IndexStatus = core_status.into();

        let changes = UpdateKnowledgeBaseRow {
            document_count: Some(new_document_count),
            total_size: Some((kb.total_size + total_size_delta).max(0)),
            index_status: Some(index_status),
            dimension: Some(Some(dimension as i32)),
            ..Default::default()
        };

        KnowledgeBaseRepository::conditional_update(
            &mut conn,
            owner_id,
            kb_id,
            kb.version as u64,
            changes,
        )
        .await?;

        Ok(())
    }
}
