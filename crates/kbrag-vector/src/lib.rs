#![forbid(unsafe_code)]
//! In-memory exact vector index (C6): add/remove/search over a per-KB
//! flat L2 index, plus the descriptor blob persisted alongside it.

mod descriptor;
mod error;
mod index;

pub use descriptor::IndexDescriptor;
pub use error::{VectorError, VectorResult};
pub use index::{SearchHit, VectorIndex};

/// Tracing target for vector index operations.
pub const TRACING_TARGET: &str = "kbrag_vector";
