//! Parser output shapes (spec §4.4).

/// One extracted record. `page_number` is `Some` only for paginated
/// formats (PDF); word-processor documents and plain text always carry
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub page_number: Option<u32>,
    pub text: String,
}

/// The parser's full output for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub pages: Vec<ParsedPage>,
    /// Tag persisted on the `Document` row as `extractionMethod`.
    pub extraction_method: &'static str,
}

impl ParsedDocument {
    /// Total extracted non-whitespace character count across all pages,
    /// used to detect `EmptyDocument` (spec §4.4).
    pub fn char_count(&self) -> usize {
        self.pages
            .iter()
            .map(|p| p.text.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    }
}
