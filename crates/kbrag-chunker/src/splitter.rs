//! Token-aware recursive chunking (spec §4.5).
//!
//! Chunking is page-bounded: each parsed page is split independently so a
//! chunk never spans a page boundary, and `chunk_index` runs continuously
//! across the whole document.

use kbrag_core::types::Chunk;
use kbrag_parser::ParsedDocument;
use text_splitter::ChunkConfig;
use tracing::instrument;
use uuid::Uuid;

use crate::config::ChunkerConfig;
use crate::error::{ChunkError, ChunkResult};
use crate::tokenizer::{bpe, count_tokens};
use crate::TRACING_TARGET;

/// Splits a parsed document's pages into chunks, deriving each chunk's
/// `vector_id` from `(kb_id, document_id, chunk_index)`.
#[instrument(skip(parsed, config), target = TRACING_TARGET, fields(kb_id = %kb_id, document_id = %document_id))]
pub fn chunk_document(
    kb_id: Uuid,
    document_id: Uuid,
    source_filename: &str,
    parsed: &ParsedDocument,
    config: ChunkerConfig,
) -> ChunkResult<Vec<Chunk>> {
    if config.overlap_tokens >= config.target_tokens {
        return Err(ChunkError::InvalidConfig(format!(
            "overlap_tokens ({}) must be less than target_tokens ({})",
            config.overlap_tokens, config.target_tokens
        )));
    }

    let chunk_config = ChunkConfig::new(config.target_tokens)
        .with_sizer(bpe())
        .with_overlap(config.overlap_tokens)
        .map_err(|err| ChunkError::InvalidConfig(err.to_string()))?;
    let splitter = text_splitter::TextSplitter::new(chunk_config);

    let mut chunks = Vec::new();
    let mut chunk_index = 0u32;

    for page in &parsed.pages {
        for piece in splitter.chunks(&page.text) {
            let token_count = count_tokens(piece);
            chunks.push(Chunk::new(
                kb_id,
                document_id,
                chunk_index,
                piece.to_string(),
                token_count,
                source_filename.to_string(),
                page.page_number,
            ));
            chunk_index += 1;
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbrag_parser::ParsedPage;

    fn parsed_from(pages: Vec<(Option<u32>, &str)>) -> ParsedDocument {
        ParsedDocument {
            pages: pages
                .into_iter()
                .map(|(page_number, text)| ParsedPage {
                    page_number,
                    text: text.to_string(),
                })
                .collect(),
            extraction_method: "text",
        }
    }

    #[test]
    fn single_short_page_yields_one_chunk() {
        let parsed = parsed_from(vec![(None, "a short document about cats and dogs.")]);
        let chunks = chunk_document(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "doc.txt",
            &parsed,
            ChunkerConfig::default(),
        )
        .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].page_number, None);
    }

    #[test]
    fn chunks_never_span_pages() {
        let long_a = "alpha beta gamma delta epsilon. ".repeat(400);
        let long_b = "zeta eta theta iota kappa. ".repeat(400);
        let parsed = parsed_from(vec![(Some(1), long_a.as_str()), (Some(2), long_b.as_str())]);
        let chunks = chunk_document(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "doc.pdf",
            &parsed,
            ChunkerConfig::default(),
        )
        .unwrap();

        assert!(chunks.iter().any(|c| c.page_number == Some(1)));
        assert!(chunks.iter().any(|c| c.page_number == Some(2)));
        // No chunk mixes text from both pages' distinctive vocabulary.
        for chunk in &chunks {
            if chunk.page_number == Some(1) {
                assert!(!chunk.text.contains("zeta"));
            } else if chunk.page_number == Some(2) {
                assert!(!chunk.text.contains("alpha"));
            }
        }
    }

    #[test]
    fn chunk_indices_run_continuously_across_pages() {
        let long_a = "alpha beta gamma delta epsilon. ".repeat(400);
        let long_b = "zeta eta theta iota kappa. ".repeat(400);
        let parsed = parsed_from(vec![(Some(1), long_a.as_str()), (Some(2), long_b.as_str())]);
        let chunks = chunk_document(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "doc.pdf",
            &parsed,
            ChunkerConfig::default(),
        )
        .unwrap();

        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, expected as u32);
        }
    }

    #[test]
    fn token_counts_respect_target_plus_overlap_bound() {
        let long = "the quick brown fox jumps over the lazy dog. ".repeat(500);
        let parsed = parsed_from(vec![(None, long.as_str())]);
        let config = ChunkerConfig::default();
        let chunks = chunk_document(Uuid::new_v4(), Uuid::new_v4(), "doc.txt", &parsed, config)
            .unwrap();

        for chunk in &chunks {
            assert!(chunk.token_count <= (config.target_tokens + config.overlap_tokens) as u32);
        }
    }

    #[test]
    fn rejects_overlap_not_smaller_than_target() {
        let parsed = parsed_from(vec![(None, "text")]);
        let config = ChunkerConfig {
            target_tokens: 100,
            overlap_tokens: 100,
        };
        let err = chunk_document(Uuid::new_v4(), Uuid::new_v4(), "doc.txt", &parsed, config)
            .unwrap_err();
        assert!(matches!(err, ChunkError::InvalidConfig(_)));
    }
}
