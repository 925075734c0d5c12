//! Document upload and removal (spec §4.10: `presignUpload`,
//! `confirmUpload`, `listDocuments`, `deleteDocument`).

use kbrag_core::object_keys::{chunks_key, original_file_key};
use kbrag_core::types::{Chunk, IndexingJob};
use kbrag_postgres::model::{DocumentRow, NewDocumentRow};
use kbrag_postgres::query::{DocumentRepository, KnowledgeBaseRepository};
use kbrag_postgres::types::DocumentStatus;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::{LifecycleError, LifecycleResult};
use crate::LifecycleContext;
use crate::TRACING_TARGET;

/// Output of `presignUpload`: enough for the client to `PUT` its file
/// directly to object storage, with no Document row yet (spec §4.10).
#[derive(Debug, Clone)]
pub struct PresignedUpload {
    pub document_id: Uuid,
    pub object_key: String,
    pub upload_url: String,
}

#[instrument(skip(ctx, filename, content_type), target = TRACING_TARGET, fields(kb_id = %kb_id))]
pub async fn presign_upload(
    ctx: &LifecycleContext,
    owner_id: Uuid,
    kb_id: Uuid,
    filename: impl Into<String>,
    content_type: impl Into<String>,
) -> LifecycleResult<PresignedUpload> {
    let filename = filename.into();
    let content_type = content_type.into();

    let mut conn = ctx.pg.get_connection().await?;
    KnowledgeBaseRepository::find_by_id(&mut conn, owner_id, kb_id)
        .await?
        .ok_or(LifecycleError::KbNotFound { kb_id })?;

    let document_id = Uuid::new_v4();
    let object_key = original_file_key(owner_id, kb_id, document_id, &filename);
    let upload_url = ctx
        .objects
        .presign_put(&object_key, &content_type, ctx.config.presign_ttl)
        .await?;

    Ok(PresignedUpload {
        document_id,
        object_key,
        upload_url,
    })
}

/// Inserts the `pending` Document row and enqueues its indexing job
/// (spec §4.10). The KB's own `embeddingModel` is carried into the job, not
/// a caller-supplied one.
#[instrument(skip(ctx, filename, content_type, object_key), target = TRACING_TARGET, fields(kb_id = %kb_id, document_id = %document_id))]
pub async fn confirm_upload(
    ctx: &LifecycleContext,
    owner_id: Uuid,
    kb_id: Uuid,
    document_id: Uuid,
    filename: impl Into<String>,
    content_type: impl Into<String>,
    object_key: impl Into<String>,
    size: u64,
) -> LifecycleResult<DocumentRow> {
    let filename = filename.into();
    let content_type = content_type.into();
    let object_key = object_key.into();

    let mut conn = ctx.pg.get_connection().await?;
    let kb = KnowledgeBaseRepository::find_by_id(&mut conn, owner_id, kb_id)
        .await?
        .ok_or(LifecycleError::KbNotFound { kb_id })?;

    let new_document = NewDocumentRow {
        kb_id,
        document_id,
        owner_id,
        filename: filename.clone(),
        content_type,
        size: size as i64,
        object_key: object_key.clone(),
    };
    let row = DocumentRepository::create(&mut conn, new_document).await?;

    let job = IndexingJob {
        kb_id,
        document_id,
        owner_id,
        object_key,
        filename,
        embedding_model: kb.embedding_model,
    };
    ctx.publisher.publish(&job).await?;

    Ok(row)
}

#[instrument(skip(ctx), target = TRACING_TARGET, fields(kb_id = %kb_id))]
pub async fn list_documents(ctx: &LifecycleContext, kb_id: Uuid) -> LifecycleResult<Vec<DocumentRow>> {
    let mut conn = ctx.pg.get_connection().await?;
    DocumentRepository::list_by_kb(&mut conn, kb_id)
        .await
        .map_err(Into::into)
}

/// Removes a document: its vectors from the KB index (if any were ever
/// merged), its chunks blob, its original file, then the Document row
/// itself (spec §4.10, §3 "Document" lifecycle).
#[instrument(skip(ctx), target = TRACING_TARGET, fields(kb_id = %kb_id, document_id = %document_id))]
pub async fn delete_document(
    ctx: &LifecycleContext,
    owner_id: Uuid,
    kb_id: Uuid,
    document_id: Uuid,
) -> LifecycleResult<()> {
    let mut conn = ctx.pg.get_connection().await?;
    let document = DocumentRepository::find_by_id(&mut conn, kb_id, document_id)
        .await?
        .filter(|d| d.owner_id == owner_id)
        .ok_or(LifecycleError::DocumentNotFound { kb_id, document_id })?;

    if document.status == DocumentStatus::Indexed {
        let key = chunks_key(kb_id, document_id);
        let vector_ids = match ctx.objects.get_object(&key).await {
            Ok(bytes) => serde_json::from_slice::<Vec<Chunk>>(&bytes)
                .map(|chunks| chunks.into_iter().map(|c| c.vector_id).collect::<Vec<_>>())
                .unwrap_or_default(),
            Err(err) => {
                warn!(target: TRACING_TARGET, error = %err, "chunks blob missing for indexed document, skipping vector removal");
                Vec::new()
            }
        };

        if !vector_ids.is_empty() {
            ctx.coordinator
                .remove_document(owner_id, kb_id, &vector_ids, document.size.max(0))
                .await?;
        }

        if let Err(err) = ctx.objects.delete_object(&key).await {
            warn!(target: TRACING_TARGET, error = %err, "best-effort chunks blob deletion failed");
        }
    }

    if let Err(err) = ctx.objects.delete_object(&document.object_key).await {
        warn!(target: TRACING_TARGET, error = %err, "best-effort original file deletion failed");
    }

    DocumentRepository::delete(&mut conn, kb_id, document_id).await?;
    Ok(())
}
