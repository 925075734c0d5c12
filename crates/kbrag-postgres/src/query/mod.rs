mod document;
mod knowledge_base;

pub use document::DocumentRepository;
pub use knowledge_base::KnowledgeBaseRepository;
