//! Chunk record and deterministic vector-id derivation (spec §3 "Chunk").

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A single chunk of document text, sized for embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_index: u32,
    pub text: String,
    pub token_count: u32,
    pub source_filename: String,
    pub page_number: Option<u32>,
    /// Stable identifier tying this chunk to its vector in the KB index.
    /// Derived deterministically from `(kb_id, document_id, chunk_index)`.
    pub vector_id: Uuid,
}

impl Chunk {
    /// Builds a chunk, deriving its `vector_id` from the owning
    /// `(kb_id, document_id, chunk_index)` triple (spec §3 "Chunk" identity).
    pub fn new(
        kb_id: Uuid,
        document_id: Uuid,
        chunk_index: u32,
        text: String,
        token_count: u32,
        source_filename: String,
        page_number: Option<u32>,
    ) -> Self {
        let vector_id = derive_vector_id(kb_id, document_id, chunk_index);
        Self {
            chunk_index,
            text,
            token_count,
            source_filename,
            page_number,
            vector_id,
        }
    }
}

/// Derives a globally unique vector id from a chunk's identity triple.
///
/// Deterministic (same triple always yields the same id) so that
/// re-delivery of an indexing job and re-computation of a chunk's identity
/// elsewhere in the system never produces duplicate vectors (spec §8
/// property 6, idempotence).
pub fn derive_vector_id(kb_id: Uuid, document_id: Uuid, chunk_index: u32) -> Uuid {
    let mut hasher = Sha256::new();
    hasher.update(kb_id.as_bytes());
    hasher.update(document_id.as_bytes());
    hasher.update(chunk_index.to_be_bytes());
    let digest = hasher.finalize();
    Uuid::new_v8(digest[..16].try_into().expect("sha256 digest is 32 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_id_is_deterministic() {
        let kb = Uuid::new_v4();
        let doc = Uuid::new_v4();
        assert_eq!(
            derive_vector_id(kb, doc, 3),
            derive_vector_id(kb, doc, 3)
        );
    }

    #[test]
    fn vector_id_differs_by_chunk_index() {
        let kb = Uuid::new_v4();
        let doc = Uuid::new_v4();
        assert_ne!(derive_vector_id(kb, doc, 0), derive_vector_id(kb, doc, 1));
    }

    #[test]
    fn vector_id_differs_across_documents() {
        let kb = Uuid::new_v4();
        assert_ne!(
            derive_vector_id(kb, Uuid::new_v4(), 0),
            derive_vector_id(kb, Uuid::new_v4(), 0)
        );
    }
}
