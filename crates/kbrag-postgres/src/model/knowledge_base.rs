//! Knowledge base row model for PostgreSQL.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use kbrag_core::types::KnowledgeBase as CoreKnowledgeBase;
use uuid::Uuid;

use crate::schema::knowledge_bases;
use crate::types::IndexStatus;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = knowledge_bases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KnowledgeBaseRow {
    pub owner_id: Uuid,
    pub kb_id: Uuid,
    pub name: String,
    pub description: String,
    pub embedding_model: String,
    pub generation_model: String,
    pub document_count: i32,
    pub total_size: i64,
    pub index_status: IndexStatus,
    pub version: i64,
    pub dimension: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = knowledge_bases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewKnowledgeBaseRow {
    pub owner_id: Uuid,
    pub kb_id: Uuid,
    pub name: String,
    pub description: String,
    pub embedding_model: String,
    pub generation_model: String,
}

/// Fields mutated by [`crate::query::KnowledgeBaseRepository::conditional_update`].
///
/// Every update to a `KnowledgeBase` row goes through the conditional path
/// (`WHERE version = expected`) so this type never includes `version`
/// itself; the repository bumps it atomically (spec §4.7 step 6).
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = knowledge_bases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateKnowledgeBaseRow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub document_count: Option<i32>,
    pub total_size: Option<i64>,
    pub index_status: Option<IndexStatus>,
    pub dimension: Option<Option<i32>>,
}

impl From<KnowledgeBaseRow> for CoreKnowledgeBase {
    fn from(row: KnowledgeBaseRow) -> Self {
        CoreKnowledgeBase {
            owner_id: row.owner_id,
            kb_id: row.kb_id,
            name: row.name,
            description: row.description,
            embedding_model: row.embedding_model,
            generation_model: row.generation_model,
            document_count: row.document_count.max(0) as u32,
            total_size: row.total_size.max(0) as u64,
            index_status: row.index_status.into(),
            version: row.version.max(0) as u64,
            dimension: row.dimension.map(|d| d.max(0) as u32),
            created_at: row.created_at.into(),
            updated_at: row.updated_at.into(),
        }
    }
}
