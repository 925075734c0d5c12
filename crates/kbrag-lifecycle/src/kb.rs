//! Knowledge base CRUD (spec §4.10: `createKB`, `updateKB`, `deleteKB`,
//! `listKBs`, `describeKB`).

use kbrag_core::object_keys::{kb_chunks_prefix, kb_documents_prefix, kb_indexes_prefix};
use kbrag_postgres::model::{KnowledgeBaseRow, NewKnowledgeBaseRow, UpdateKnowledgeBaseRow};
use kbrag_postgres::query::{DocumentRepository, KnowledgeBaseRepository};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::{LifecycleError, LifecycleResult};
use crate::LifecycleContext;
use crate::TRACING_TARGET;

/// Mutable fields of a KB patch (spec §4.10: "only name and description are
/// mutable").
#[derive(Debug, Clone, Default)]
pub struct UpdateKbPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[instrument(skip(ctx, name, description), target = TRACING_TARGET, fields(owner_id = %owner_id))]
pub async fn create_kb(
    ctx: &LifecycleContext,
    owner_id: Uuid,
    name: impl Into<String>,
    description: impl Into<String>,
    embedding_model: impl Into<String>,
    generation_model: impl Into<String>,
) -> LifecycleResult<KnowledgeBaseRow> {
    let mut conn = ctx.pg.get_connection().await?;
    let new_kb = NewKnowledgeBaseRow {
        owner_id,
        kb_id: Uuid::new_v4(),
        name: name.into(),
        description: description.into(),
        embedding_model: embedding_model.into(),
        generation_model: generation_model.into(),
    };
    KnowledgeBaseRepository::create(&mut conn, new_kb)
        .await
        .map_err(Into::into)
}

/// Applies `patch`, guarded by `expected_version` (spec §4.10, optimistic
/// concurrency on the KB row's `version`).
#[instrument(skip(ctx, patch), target = TRACING_TARGET, fields(kb_id = %kb_id, expected_version))]
pub async fn update_kb(
    ctx: &LifecycleContext,
    owner_id: Uuid,
    kb_id: Uuid,
    expected_version: u64,
    patch: UpdateKbPatch,
) -> LifecycleResult<KnowledgeBaseRow> {
    let mut conn = ctx.pg.get_connection().await?;
    let changes = UpdateKnowledgeBaseRow {
        name: patch.name,
        description: patch.description,
        ..Default::default()
    };
    KnowledgeBaseRepository::conditional_update(&mut conn, owner_id, kb_id, expected_version, changes)
        .await
        .map_err(Into::into)
}

/// Deletes a KB: objects under its prefixes and every Document row first,
/// the KB row last. Object deletion is best-effort — failures are logged
/// but never block metadata deletion (spec §4.10).
#[instrument(skip(ctx), target = TRACING_TARGET, fields(kb_id = %kb_id))]
pub async fn delete_kb(ctx: &LifecycleContext, owner_id: Uuid, kb_id: Uuid) -> LifecycleResult<()> {
    let mut conn = ctx.pg.get_connection().await?;
    KnowledgeBaseRepository::find_by_id(&mut conn, owner_id, kb_id)
        .await?
        .ok_or(LifecycleError::KbNotFound { kb_id })?;

    for prefix in [
        kb_documents_prefix(owner_id, kb_id),
        kb_chunks_prefix(kb_id),
        kb_indexes_prefix(kb_id),
    ] {
        if let Err(err) = ctx.objects.delete_prefix(&prefix).await {
            warn!(target: TRACING_TARGET, prefix = %prefix, error = %err, "best-effort object deletion failed during KB delete");
        }
    }

    let documents = DocumentRepository::list_by_kb(&mut conn, kb_id).await?;
    for document in documents {
        DocumentRepository::delete(&mut conn, kb_id, document.document_id).await?;
    }

    KnowledgeBaseRepository::delete(&mut conn, owner_id, kb_id).await?;
    Ok(())
}

#[instrument(skip(ctx), target = TRACING_TARGET, fields(owner_id = %owner_id))]
pub async fn list_kbs(ctx: &LifecycleContext, owner_id: Uuid) -> LifecycleResult<Vec<KnowledgeBaseRow>> {
    let mut conn = ctx.pg.get_connection().await?;
    KnowledgeBaseRepository::list_by_owner(&mut conn, owner_id)
        .await
        .map_err(Into::into)
}

#[instrument(skip(ctx), target = TRACING_TARGET, fields(kb_id = %kb_id))]
pub async fn describe_kb(
    ctx: &LifecycleContext,
    owner_id: Uuid,
    kb_id: Uuid,
) -> LifecycleResult<KnowledgeBaseRow> {
    let mut conn = ctx.pg.get_connection().await?;
    KnowledgeBaseRepository::find_by_id(&mut conn, owner_id, kb_id)
        .await?
        .ok_or(LifecycleError::KbNotFound { kb_id })
}
