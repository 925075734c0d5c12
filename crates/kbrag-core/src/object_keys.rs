//! Object-store key layout (spec §6 "Object layout").
//!
//! Centralized here so that every component that needs to address a blob —
//! the worker, the coordinator, the query engine, the lifecycle operations —
//! agrees on the same key shapes.

use uuid::Uuid;

/// `documents/<ownerId>/<kbId>/<documentId>/<filename>`
pub fn original_file_key(owner_id: Uuid, kb_id: Uuid, document_id: Uuid, filename: &str) -> String {
    format!("documents/{owner_id}/{kb_id}/{document_id}/{filename}")
}

/// `chunks/<kbId>/<documentId>.json`
pub fn chunks_key(kb_id: Uuid, document_id: Uuid) -> String {
    format!("chunks/{kb_id}/{document_id}.json")
}

/// `indexes/<kbId>/index.bin`
pub fn index_payload_key(kb_id: Uuid) -> String {
    format!("indexes/{kb_id}/index.bin")
}

/// `indexes/<kbId>/index.meta.json`
pub fn index_descriptor_key(kb_id: Uuid) -> String {
    format!("indexes/{kb_id}/index.meta.json")
}

/// `documents/<ownerId>/<kbId>/` — prefix removed wholesale on KB delete.
pub fn kb_documents_prefix(owner_id: Uuid, kb_id: Uuid) -> String {
    format!("documents/{owner_id}/{kb_id}/")
}

/// `chunks/<kbId>/` — prefix removed wholesale on KB delete.
pub fn kb_chunks_prefix(kb_id: Uuid) -> String {
    format!("chunks/{kb_id}/")
}

/// `indexes/<kbId>/` — prefix removed wholesale on KB delete.
pub fn kb_indexes_prefix(kb_id: Uuid) -> String {
    format!("indexes/{kb_id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_shaped_as_spec_layout() {
        let owner = Uuid::new_v4();
        let kb = Uuid::new_v4();
        let doc = Uuid::new_v4();

        assert_eq!(
            original_file_key(owner, kb, doc, "hse.pdf"),
            format!("documents/{owner}/{kb}/{doc}/hse.pdf")
        );
        assert_eq!(chunks_key(kb, doc), format!("chunks/{kb}/{doc}.json"));
        assert_eq!(index_payload_key(kb), format!("indexes/{kb}/index.bin"));
        assert_eq!(
            index_descriptor_key(kb),
            format!("indexes/{kb}/index.meta.json")
        );
    }

    #[test]
    fn document_key_is_nested_under_its_prefix() {
        let owner = Uuid::new_v4();
        let kb = Uuid::new_v4();
        let doc = Uuid::new_v4();
        let key = original_file_key(owner, kb, doc, "a.pdf");
        assert!(key.starts_with(&kb_documents_prefix(owner, kb)));
    }
}
