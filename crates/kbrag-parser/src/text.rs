//! Plain text extraction: the full contents as a single record (spec
//! §4.4).

use crate::error::{ParseError, ParseResult};
use crate::types::{ParsedDocument, ParsedPage};

pub(crate) fn parse(bytes: &[u8]) -> ParseResult<ParsedDocument> {
    let text = String::from_utf8(bytes.to_vec())
        .map_err(|err| ParseError::CorruptInput(err.to_string()))?;

    Ok(ParsedDocument {
        pages: vec![ParsedPage {
            page_number: None,
            text,
        }],
        extraction_method: "text",
    })
}
