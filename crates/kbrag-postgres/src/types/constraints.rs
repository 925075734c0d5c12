//! Constraint violation classification, mirroring
//! `nvisy-postgres::types::constraints`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Broad category a constraint violation falls into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    Validation,
    Chronological,
    ForeignKey,
    Uniqueness,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    #[strum(serialize = "knowledge_bases_name_length_min")]
    KbNameLengthMin,
    #[strum(serialize = "knowledge_bases_name_length_max")]
    KbNameLengthMax,
    #[strum(serialize = "knowledge_bases_document_count_min")]
    KbDocumentCountMin,
    #[strum(serialize = "knowledge_bases_total_size_min")]
    KbTotalSizeMin,
    #[strum(serialize = "knowledge_bases_version_min")]
    KbVersionMin,
    #[strum(serialize = "knowledge_bases_updated_after_created")]
    KbUpdatedAfterCreated,
    #[strum(serialize = "knowledge_bases_pkey")]
    KbDuplicatePrimaryKey,

    #[strum(serialize = "documents_filename_length_min")]
    DocumentFilenameLengthMin,
    #[strum(serialize = "documents_size_min")]
    DocumentSizeMin,
    #[strum(serialize = "documents_chunk_count_min")]
    DocumentChunkCountMin,
    #[strum(serialize = "documents_indexed_after_uploaded")]
    DocumentIndexedAfterUploaded,
    #[strum(serialize = "documents_kb_fk")]
    DocumentKbForeignKey,
    #[strum(serialize = "documents_pkey")]
    DocumentDuplicatePrimaryKey,
}

impl ConstraintViolation {
    /// Parses a Postgres constraint name into a known violation, if recognized.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::KbNameLengthMin
            | Self::KbNameLengthMax
            | Self::KbDocumentCountMin
            | Self::KbTotalSizeMin
            | Self::KbVersionMin
            | Self::DocumentFilenameLengthMin
            | Self::DocumentSizeMin
            | Self::DocumentChunkCountMin => ConstraintCategory::Validation,

            Self::KbUpdatedAfterCreated | Self::DocumentIndexedAfterUploaded => {
                ConstraintCategory::Chronological
            }

            Self::DocumentKbForeignKey => ConstraintCategory::ForeignKey,

            Self::KbDuplicatePrimaryKey | Self::DocumentDuplicatePrimaryKey => {
                ConstraintCategory::Uniqueness
            }
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
