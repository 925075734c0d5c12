//! Document repository.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::model::{DocumentRow, NewDocumentRow, UpdateDocumentRow};
use crate::types::DocumentStatus;
use crate::{PgError, PgResult, TRACING_TARGET_QUERY, schema};

#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentRepository;

impl DocumentRepository {
    #[tracing::instrument(skip(conn, new_document), target = TRACING_TARGET_QUERY)]
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_document: NewDocumentRow,
    ) -> PgResult<DocumentRow> {
        use schema::documents;

        diesel::insert_into(documents::table)
            .values(&new_document)
            .returning(DocumentRow::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        kb_id: Uuid,
        document_id: Uuid,
    ) -> PgResult<Option<DocumentRow>> {
        use schema::documents::dsl;

        dsl::documents
            .filter(dsl::kb_id.eq(kb_id))
            .filter(dsl::document_id.eq(document_id))
            .select(DocumentRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn list_by_kb(
        conn: &mut AsyncPgConnection,
        kb_id: Uuid,
    ) -> PgResult<Vec<DocumentRow>> {
        use schema::documents::dsl;

        dsl::documents
            .filter(dsl::kb_id.eq(kb_id))
            .select(DocumentRow::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)
    }

    /// Counts documents in `pending` or `processing` state, used to derive
    /// `KnowledgeBase.index_status` (spec §4.10).
    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn count_in_flight(
        conn: &mut AsyncPgConnection,
        kb_id: Uuid,
    ) -> PgResult<i64> {
        use schema::documents::dsl;

        dsl::documents
            .filter(dsl::kb_id.eq(kb_id))
            .filter(dsl::status.eq_any([DocumentStatus::Pending, DocumentStatus::Processing]))
            .count()
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    /// Whether any document in `kb_id` has ever reached `indexed`, used to
    /// decide `indexStatus = error` semantics on coordinator retry
    /// exhaustion (spec §4.10 state machine).
    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn any_indexed(conn: &mut AsyncPgConnection, kb_id: Uuid) -> PgResult<bool> {
        use schema::documents::dsl;

        let count: i64 = dsl::documents
            .filter(dsl::kb_id.eq(kb_id))
            .filter(dsl::status.eq(DocumentStatus::Indexed))
            .count()
            .get_result(conn)
            .await
            .map_err(PgError::from)?;
        Ok(count > 0)
    }

    #[tracing::instrument(skip(conn, changes), target = TRACING_TARGET_QUERY)]
    pub async fn update(
        conn: &mut AsyncPgConnection,
        kb_id: Uuid,
        document_id: Uuid,
        changes: UpdateDocumentRow,
    ) -> PgResult<DocumentRow> {
        use schema::documents::dsl;

        diesel::update(dsl::documents)
            .filter(dsl::kb_id.eq(kb_id))
            .filter(dsl::document_id.eq(document_id))
            .set(&changes)
            .returning(DocumentRow::as_returning())
            .get_result(conn)
            .await
            .map_err(|err| match err {
                diesel::result::Error::NotFound => PgError::NotFound,
                other => PgError::from(other),
            })
    }

    /// Applies `changes` only if the row's `status` still equals
    /// `expected_status` — the guard that makes a worker's status
    /// transition safe against redelivery (spec §4.8 step 1-2).
    #[tracing::instrument(skip(conn, changes), target = TRACING_TARGET_QUERY, fields(expected_status = ?expected_status))]
    pub async fn conditional_transition(
        conn: &mut AsyncPgConnection,
        kb_id: Uuid,
        document_id: Uuid,
        expected_status: DocumentStatus,
        changes: UpdateDocumentRow,
    ) -> PgResult<Option<DocumentRow>> {
        use schema::documents::dsl;

        diesel::update(dsl::documents)
            .filter(dsl::kb_id.eq(kb_id))
            .filter(dsl::document_id.eq(document_id))
            .filter(dsl::status.eq(expected_status))
            .set(&changes)
            .returning(DocumentRow::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn delete(
        conn: &mut AsyncPgConnection,
        kb_id: Uuid,
        document_id: Uuid,
    ) -> PgResult<()> {
        use schema::documents::dsl;

        diesel::delete(dsl::documents)
            .filter(dsl::kb_id.eq(kb_id))
            .filter(dsl::document_id.eq(document_id))
            .execute(conn)
            .await
            .map_err(PgError::from)?;
        Ok(())
    }
}
