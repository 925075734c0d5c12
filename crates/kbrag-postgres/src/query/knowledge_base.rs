//! Knowledge base repository, including the optimistic-concurrency
//! conditional update used by the index coordinator (spec §4.7 step 6-7).

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{KnowledgeBaseRow, NewKnowledgeBaseRow, UpdateKnowledgeBaseRow};
use crate::{PgError, PgResult, TRACING_TARGET_QUERY, schema};

#[derive(Debug, Default, Clone, Copy)]
pub struct KnowledgeBaseRepository;

impl KnowledgeBaseRepository {
    #[tracing::instrument(skip(conn, new_kb), target = TRACING_TARGET_QUERY)]
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_kb: NewKnowledgeBaseRow,
    ) -> PgResult<KnowledgeBaseRow> {
        use schema::knowledge_bases;

        diesel::insert_into(knowledge_bases::table)
            .values(&new_kb)
            .returning(KnowledgeBaseRow::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        owner_id: Uuid,
        kb_id: Uuid,
    ) -> PgResult<Option<KnowledgeBaseRow>> {
        use schema::knowledge_bases::dsl;

        dsl::knowledge_bases
            .filter(dsl::owner_id.eq(owner_id))
            .filter(dsl::kb_id.eq(kb_id))
            .select(KnowledgeBaseRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn list_by_owner(
        conn: &mut AsyncPgConnection,
        owner_id: Uuid,
    ) -> PgResult<Vec<KnowledgeBaseRow>> {
        use schema::knowledge_bases::dsl;

        dsl::knowledge_bases
            .filter(dsl::owner_id.eq(owner_id))
            .select(KnowledgeBaseRow::as_select())
            .load(conn)
            .await
            .map_err(PgError::from)
    }

    /// Applies `changes` only if the row's `version` still equals
    /// `expected_version`, bumping it by one on success. Zero rows
    /// affected means another writer won the race; the coordinator is
    /// expected to retry with linear backoff (spec §4.7 steps 4-6).
    #[tracing::instrument(skip(conn, changes), target = TRACING_TARGET_QUERY, fields(expected_version))]
    pub async fn conditional_update(
        conn: &mut AsyncPgConnection,
        owner_id: Uuid,
        kb_id: Uuid,
        expected_version: u64,
        changes: UpdateKnowledgeBaseRow,
    ) -> PgResult<KnowledgeBaseRow> {
        use schema::knowledge_bases::dsl;

        let updated = diesel::update(dsl::knowledge_bases)
            .filter(dsl::owner_id.eq(owner_id))
            .filter(dsl::kb_id.eq(kb_id))
            .filter(dsl::version.eq(expected_version as i64))
            .set((
                &changes,
                dsl::version.eq(expected_version as i64 + 1),
                dsl::updated_at.eq(Timestamp::from(jiff::Timestamp::now())),
            ))
            .returning(KnowledgeBaseRow::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        updated.ok_or(PgError::VersionConflict {
            expected: expected_version,
        })
    }

    #[tracing::instrument(skip(conn), target = TRACING_TARGET_QUERY)]
    pub async fn delete(
        conn: &mut AsyncPgConnection,
        owner_id: Uuid,
        kb_id: Uuid,
    ) -> PgResult<()> {
        use schema::knowledge_bases::dsl;

        diesel::delete(dsl::knowledge_bases)
            .filter(dsl::owner_id.eq(owner_id))
            .filter(dsl::kb_id.eq(kb_id))
            .execute(conn)
            .await
            .map_err(PgError::from)?;
        Ok(())
    }
}
