//! Document row model for PostgreSQL.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use kbrag_core::types::Document as CoreDocument;
use uuid::Uuid;

use crate::schema::documents;
use crate::types::DocumentStatus;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    pub kb_id: Uuid,
    pub document_id: Uuid,
    pub owner_id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub object_key: String,
    pub status: DocumentStatus,
    pub uploaded_at: Timestamp,
    pub indexed_at: Option<Timestamp>,
    pub error_message: Option<String>,
    pub chunk_count: Option<i32>,
    pub extraction_method: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentRow {
    pub kb_id: Uuid,
    pub document_id: Uuid,
    pub owner_id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub object_key: String,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateDocumentRow {
    pub status: Option<DocumentStatus>,
    pub indexed_at: Option<Option<Timestamp>>,
    pub error_message: Option<Option<String>>,
    pub chunk_count: Option<Option<i32>>,
    pub extraction_method: Option<Option<String>>,
}

impl From<DocumentRow> for CoreDocument {
    fn from(row: DocumentRow) -> Self {
        CoreDocument {
            kb_id: row.kb_id,
            document_id: row.document_id,
            filename: row.filename,
            content_type: row.content_type,
            size: row.size.max(0) as u64,
            object_key: row.object_key,
            status: row.status.into(),
            uploaded_at: row.uploaded_at.into(),
            indexed_at: row.indexed_at.map(Into::into),
            error_message: row.error_message,
            chunk_count: row.chunk_count.map(|c| c.max(0) as u32),
            extraction_method: row.extraction_method,
        }
    }
}
