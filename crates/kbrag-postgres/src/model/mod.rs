mod document;
mod knowledge_base;

pub use document::{DocumentRow, NewDocumentRow, UpdateDocumentRow};
pub use knowledge_base::{KnowledgeBaseRow, NewKnowledgeBaseRow, UpdateKnowledgeBaseRow};
