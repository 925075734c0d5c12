//! Resolves search hits (bare `vectorId`s) to chunk text, and builds the
//! deduplicated `sources` list (spec §4.9 steps 6, 9).
//!
//! The vector index stores only `vectorId`s; the text lives in each
//! document's chunks blob. Since every vector present in the index has
//! exactly one chunk sharing its id (spec §3 "Vector index" invariant), we
//! resolve hits by loading the chunks blob of every indexed document in the
//! KB once per query and looking vectors up in the resulting map.

use std::collections::HashMap;

use kbrag_core::object_keys::chunks_key;
use kbrag_core::types::Chunk;
use kbrag_object::ObjectStoreGateway;
use kbrag_postgres::query::DocumentRepository;
use kbrag_postgres::types::DocumentStatus;
use kbrag_postgres::PgConn;
use kbrag_vector::SearchHit;
use tracing::warn;
use uuid::Uuid;

use crate::error::QueryResult;
use crate::TRACING_TARGET;

/// A chunk pulled into the answer, carrying the distance it was retrieved
/// at so the prompt can list context in ascending-distance order.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub text: String,
    pub source_filename: String,
    pub page_number: Option<u32>,
    pub distance: f32,
}

/// Resolves `hits` (already ordered ascending by distance) into their chunk
/// text, silently dropping any hit whose chunk cannot be found — a stale
/// index entry for a document whose chunks blob was already removed.
pub async fn resolve_hits(
    conn: &mut PgConn,
    objects: &ObjectStoreGateway,
    kb_id: Uuid,
    hits: &[SearchHit],
) -> QueryResult<Vec<RetrievedChunk>> {
    let by_vector_id = load_vector_index(conn, objects, kb_id).await?;

    let mut resolved = Vec::with_capacity(hits.len());
    for hit in hits {
        match by_vector_id.get(&hit.vector_id) {
            Some(chunk) => resolved.push(RetrievedChunk {
                text: chunk.text.clone(),
                source_filename: chunk.source_filename.clone(),
                page_number: chunk.page_number,
                distance: hit.distance,
            }),
            None => {
                warn!(target: TRACING_TARGET, vector_id = %hit.vector_id, "search hit had no matching chunk, dropping");
            }
        }
    }
    Ok(resolved)
}

async fn load_vector_index(
    conn: &mut PgConn,
    objects: &ObjectStoreGateway,
    kb_id: Uuid,
) -> QueryResult<HashMap<Uuid, Chunk>> {
    let documents = DocumentRepository::list_by_kb(conn, kb_id).await?;

    let mut by_vector_id = HashMap::new();
    for document in documents.iter().filter(|d| d.status == DocumentStatus::Indexed) {
        let bytes = objects
            .get_object(&chunks_key(kb_id, document.document_id))
            .await?;
        let chunks: Vec<Chunk> = serde_json::from_slice(&bytes).map_err(|e| {
            kbrag_object::StorageError::Fatal(format!("corrupt chunks blob: {e}"))
        })?;
        for chunk in chunks {
            by_vector_id.insert(chunk.vector_id, chunk);
        }
    }
    Ok(by_vector_id)
}

/// Deduplicates `chunks` by `(sourceFilename, pageNumber)`, keeping first
/// appearance order, formatted as `"<filename> (Page <n>)"` when a page
/// number is present, else `"<filename>"` (spec §4.9 step 9).
pub fn build_sources(chunks: &[RetrievedChunk]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut sources = Vec::new();
    for chunk in chunks {
        let key = (chunk.source_filename.clone(), chunk.page_number);
        if seen.insert(key) {
            sources.push(match chunk.page_number {
                Some(page) => format!("{} (Page {page})", chunk.source_filename),
                None => chunk.source_filename.clone(),
            });
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(filename: &str, page: Option<u32>, distance: f32) -> RetrievedChunk {
        RetrievedChunk {
            text: "text".into(),
            source_filename: filename.into(),
            page_number: page,
            distance,
        }
    }

    #[test]
    fn sources_are_formatted_with_page_when_present() {
        let chunks = vec![chunk("hse.pdf", Some(2), 0.1)];
        assert_eq!(build_sources(&chunks), vec!["hse.pdf (Page 2)"]);
    }

    #[test]
    fn sources_omit_page_when_absent() {
        let chunks = vec![chunk("notes.txt", None, 0.1)];
        assert_eq!(build_sources(&chunks), vec!["notes.txt"]);
    }

    #[test]
    fn sources_dedup_by_filename_and_page_preserving_first_appearance() {
        let chunks = vec![
            chunk("hse.pdf", Some(1), 0.1),
            chunk("hse.pdf", Some(2), 0.2),
            chunk("hse.pdf", Some(1), 0.3),
            chunk("other.pdf", None, 0.4),
        ];
        assert_eq!(
            build_sources(&chunks),
            vec!["hse.pdf (Page 1)", "hse.pdf (Page 2)", "other.pdf"]
        );
    }
}
