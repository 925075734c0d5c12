//! Shared domain types (spec §3).

mod chunk;
mod document;
mod job;
mod kb;
mod query;

pub use chunk::{Chunk, derive_vector_id};
pub use document::{Document, DocumentStatus};
pub use job::IndexingJob;
pub use kb::{IndexStatus, KnowledgeBase};
pub use query::{GenerationParams, HistoryTurn, QueryRequest, QueryResponse, Role, MAX_HISTORY_TURNS};
