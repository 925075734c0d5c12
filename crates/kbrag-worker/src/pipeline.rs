//! One job's ingestion pipeline: parse -> chunk -> embed -> merge
//! (spec §4.8).

use bytes::Bytes;
use kbrag_chunker::chunk_document;
use kbrag_core::object_keys::chunks_key;
use kbrag_core::truncate_error_message;
use kbrag_core::types::{Chunk, IndexingJob};
use kbrag_parser::parse_document;
use kbrag_postgres::model::UpdateDocumentRow;
use kbrag_postgres::query::{DocumentRepository, KnowledgeBaseRepository};
use kbrag_postgres::types::DocumentStatus as PgDocumentStatus;
use tracing::{info, instrument, warn};

use crate::context::WorkerContext;
use crate::error::{WorkerError, WorkerResult};
use crate::TRACING_TARGET;

/// What happened to a job after one pipeline run.
#[derive(Debug)]
pub enum JobOutcome {
    /// The document was successfully indexed.
    Indexed { chunk_count: u32 },
    /// No work was done: the document was not `pending`, or another
    /// worker already won the status transition (spec §4.8 step 1-2,
    /// idempotent redelivery).
    Skipped,
    /// The document was transitioned to `failed` with `reason`.
    Failed { reason: String },
}

#[instrument(skip(ctx, job), target = TRACING_TARGET, fields(kb_id = %job.kb_id, document_id = %job.document_id))]
pub async fn process_job(ctx: &WorkerContext, job: &IndexingJob) -> WorkerResult<JobOutcome> {
    let mut conn = ctx.pg.get_connection().await?;

    // Step 1: read the Document row; only `pending` documents proceed.
    let Some(document) =
        DocumentRepository::find_by_id(&mut conn, job.kb_id, job.document_id).await?
    else {
        warn!(target: TRACING_TARGET, "document row missing, skipping job");
        return Ok(JobOutcome::Skipped);
    };
    if document.status != PgDocumentStatus::Pending {
        return Ok(JobOutcome::Skipped);
    }

    // Step 2: conditionally transition to `processing`.
    let transitioned = DocumentRepository::conditional_transition(
        &mut conn,
        job.kb_id,
        job.document_id,
        PgDocumentStatus::Pending,
        UpdateDocumentRow {
            status: Some(PgDocumentStatus::Processing),
            ..Default::default()
        },
    )
    .await?;
    if transitioned.is_none() {
        return Ok(JobOutcome::Skipped);
    }

    match run_ingestion(ctx, job, &mut conn, &document).await {
        Ok(chunk_count) => Ok(JobOutcome::Indexed { chunk_count }),
        Err(err) => {
            let reason = truncate_error_message(&err.to_string());
            warn!(target: TRACING_TARGET, error = %err, "job failed, marking document failed");
            DocumentRepository::update(
                &mut conn,
                job.kb_id,
                job.document_id,
                UpdateDocumentRow {
                    status: Some(PgDocumentStatus::Failed),
                    error_message: Some(Some(reason.clone())),
                    ..Default::default()
                },
            )
            .await?;
            Ok(JobOutcome::Failed { reason })
        }
    }
}

async fn run_ingestion(
    ctx: &WorkerContext,
    job: &IndexingJob,
    conn: &mut kbrag_postgres::PgConn,
    document: &kbrag_postgres::model::DocumentRow,
) -> WorkerResult<u32> {
    let document_size = document.size.max(0) as u64;

    // Step 3: download the original file.
    let bytes = ctx.objects.get_object(&job.object_key).await?;

    // Step 4: parse then chunk.
    let parsed = parse_document(&bytes, &document.content_type, &job.filename)?;
    let chunks = chunk_document(
        job.kb_id,
        job.document_id,
        &job.filename,
        &parsed,
        ctx.chunker_config,
    )?;
    if chunks.is_empty() {
        return Err(WorkerError::EmptyDocument);
    }

    // Step 5: embed, validating dimension consistency.
    let texts = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = ctx.models.embed(&job.embedding_model, texts).await?;
    let kb_dimension = KnowledgeBaseRepository::find_by_id(conn, job.owner_id, job.kb_id)
        .await?
        .and_then(|kb| kb.dimension)
        .map(|d| d as usize);
    validate_uniform_dimension(&vectors, kb_dimension)?;

    // Step 6: persist the chunks blob.
    let chunk_count = chunks.len() as u32;
    let payload = serde_json::to_vec(&chunks).map_err(|e| {
        WorkerError::Storage(kbrag_object::StorageError::Fatal(e.to_string()))
    })?;
    ctx.objects
        .put_object(
            &chunks_key(job.kb_id, job.document_id),
            Bytes::from(payload),
            "application/json",
        )
        .await?;

    // Step 7: merge into the KB's vector index.
    let vector_ids = chunks.iter().map(|c: &Chunk| c.vector_id).collect();
    ctx.coordinator
        .merge_document(job.owner_id, job.kb_id, vectors, vector_ids, document_size)
        .await?;

    // Step 8: transition to `indexed`.
    DocumentRepository::update(
        conn,
        job.kb_id,
        job.document_id,
        UpdateDocumentRow {
            status: Some(PgDocumentStatus::Indexed),
            indexed_at: Some(Some(jiff_diesel::Timestamp::from(jiff::Timestamp::now()))),
            chunk_count: Some(Some(chunk_count as i32)),
            extraction_method: Some(Some(parsed.extraction_method.to_string())),
            ..Default::default()
        },
    )
    .await?;

    info!(target: TRACING_TARGET, chunk_count, "document indexed");
    Ok(chunk_count)
}

/// Confirms every vector in a batch shares one dimension, and that the
/// dimension matches the KB's recorded one if it has already been set
/// (spec §4.8 step 5).
fn validate_uniform_dimension(
    vectors: &[Vec<f32>],
    kb_dimension: Option<usize>,
) -> WorkerResult<usize> {
    let expected_dim = kb_dimension
        .or_else(|| vectors.first().map(Vec::len))
        .unwrap_or(0);

    for vector in vectors {
        if vector.len() != expected_dim {
            return Err(WorkerError::DimensionMismatch {
                expected: expected_dim,
                actual: vector.len(),
            });
        }
    }
    Ok(expected_dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_batch_with_no_recorded_dimension_is_accepted() {
        let vectors = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(validate_uniform_dimension(&vectors, None).unwrap(), 2);
    }

    #[test]
    fn batch_disagreeing_internally_is_rejected() {
        let vectors = vec![vec![1.0, 2.0], vec![3.0, 4.0, 5.0]];
        let err = validate_uniform_dimension(&vectors, None).unwrap_err();
        assert!(matches!(err, WorkerError::DimensionMismatch { .. }));
    }

    #[test]
    fn batch_disagreeing_with_kb_dimension_is_rejected() {
        let vectors = vec![vec![1.0, 2.0]];
        let err = validate_uniform_dimension(&vectors, Some(3)).unwrap_err();
        assert!(matches!(
            err,
            WorkerError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn batch_matching_kb_dimension_is_accepted() {
        let vectors = vec![vec![1.0, 2.0, 3.0]];
        assert_eq!(validate_uniform_dimension(&vectors, Some(3)).unwrap(), 3);
    }
}
