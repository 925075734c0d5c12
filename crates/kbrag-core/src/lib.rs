#![forbid(unsafe_code)]
//! Shared domain types and cross-cutting error taxonomy for the knowledge
//! base RAG core. Every other `kbrag-*` crate depends on this one.

pub mod error;
pub mod object_keys;
pub mod retry;
pub mod types;

pub use error::{truncate_error_message, CoreErrorKind};

/// Tracing target for cross-cutting core events.
pub const TRACING_TARGET: &str = "kbrag_core";
