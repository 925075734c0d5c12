//! Word-processor document extraction: sequential paragraph text with no
//! page numbers (spec §4.4).

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use tracing::instrument;

use crate::error::{ParseError, ParseResult};
use crate::types::{ParsedDocument, ParsedPage};
use crate::TRACING_TARGET;

#[instrument(skip(bytes), target = TRACING_TARGET)]
pub(crate) fn parse(bytes: &[u8]) -> ParseResult<ParsedDocument> {
    let docx = read_docx(bytes).map_err(|err| ParseError::CorruptInput(err.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for run_child in paragraph.children {
                if let ParagraphChild::Run(run) = run_child {
                    for inner in run.children {
                        if let RunChild::Text(t) = inner {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            if !text.trim().is_empty() {
                paragraphs.push(text);
            }
        }
    }

    let pages = vec![ParsedPage {
        page_number: None,
        text: paragraphs.join("\n\n"),
    }];

    Ok(ParsedDocument {
        pages,
        extraction_method: "docx",
    })
}
