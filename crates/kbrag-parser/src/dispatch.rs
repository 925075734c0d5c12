//! Content-type dispatch with filename-extension fallback (spec §4.4).

use tracing::instrument;

use crate::error::{ParseError, ParseResult};
use crate::types::ParsedDocument;
use crate::TRACING_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Pdf,
    Docx,
    Text,
}

fn format_from_content_type(content_type: &str) -> Option<Format> {
    match content_type.split(';').next().unwrap_or("").trim() {
        "application/pdf" => Some(Format::Pdf),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            Some(Format::Docx)
        }
        "text/plain" => Some(Format::Text),
        _ => None,
    }
}

fn format_from_extension(filename: &str) -> Option<Format> {
    let ext = filename.rsplit('.').next()?.to_lowercase();
    match ext.as_str() {
        "pdf" => Some(Format::Pdf),
        "docx" => Some(Format::Docx),
        "txt" => Some(Format::Text),
        _ => None,
    }
}

/// Parses `bytes` into an ordered sequence of page/paragraph records.
/// Dispatches on the declared content type, falling back to the filename
/// extension when the content type is absent or unrecognized.
#[instrument(skip(bytes), target = TRACING_TARGET, fields(content_type, filename))]
pub fn parse_document(bytes: &[u8], content_type: &str, filename: &str) -> ParseResult<ParsedDocument> {
    let format = format_from_content_type(content_type)
        .or_else(|| format_from_extension(filename))
        .ok_or_else(|| ParseError::UnsupportedFormat {
            content_type: content_type.to_string(),
            filename: filename.to_string(),
        })?;

    let parsed = match format {
        Format::Pdf => crate::pdf::parse(bytes)?,
        Format::Docx => crate::docx::parse(bytes)?,
        Format::Text => crate::text::parse(bytes)?,
    };

    if parsed.char_count() == 0 {
        return Err(ParseError::EmptyDocument);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_text_by_content_type() {
        let doc = parse_document(b"hello world", "text/plain", "ignored.bin").unwrap();
        assert_eq!(doc.extraction_method, "text");
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].page_number, None);
    }

    #[test]
    fn falls_back_to_extension_when_content_type_unrecognized() {
        let doc = parse_document(b"hello world", "application/octet-stream", "notes.txt").unwrap();
        assert_eq!(doc.extraction_method, "text");
    }

    #[test]
    fn unrecognized_format_and_extension_is_unsupported() {
        let err = parse_document(b"binary junk", "application/octet-stream", "file.bin").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat { .. }));
    }

    #[test]
    fn empty_text_input_is_empty_document() {
        let err = parse_document(b"", "text/plain", "empty.txt").unwrap_err();
        assert!(matches!(err, ParseError::EmptyDocument));
    }

    #[test]
    fn whitespace_only_text_input_is_empty_document() {
        let err = parse_document(b"   \n\t  ", "text/plain", "whitespace.txt").unwrap_err();
        assert!(matches!(err, ParseError::EmptyDocument));
    }

    #[test]
    fn invalid_utf8_text_is_corrupt_input() {
        let err = parse_document(&[0xff, 0xfe, 0xfd], "text/plain", "bad.txt").unwrap_err();
        assert!(matches!(err, ParseError::CorruptInput(_)));
    }
}
