//! PDF extraction, page by page (spec §4.4).

use std::io::Write;

use tracing::instrument;

use crate::error::{ParseError, ParseResult};
use crate::types::{ParsedDocument, ParsedPage};
use crate::TRACING_TARGET;

/// `pdf-extract`'s page-boundary API operates on a filesystem path, so the
/// in-memory bytes are spooled to a temp file first.
#[instrument(skip(bytes), target = TRACING_TARGET)]
pub(crate) fn parse(bytes: &[u8]) -> ParseResult<ParsedDocument> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(bytes)?;
    file.flush()?;

    let pages = pdf_extract::extract_text_by_pages(file.path())
        .map_err(|err| ParseError::CorruptInput(err.to_string()))?;

    let pages = pages
        .into_iter()
        .enumerate()
        .map(|(index, text)| ParsedPage {
            page_number: Some(index as u32 + 1),
            text,
        })
        .collect();

    Ok(ParsedDocument {
        pages,
        extraction_method: "pdf",
    })
}
