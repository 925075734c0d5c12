#![forbid(unsafe_code)]
//! Knowledge base and document lifecycle (C10): creation, updates, presigned
//! uploads, and deletion of KBs and their documents (spec §4.10).

mod config;
mod context;
mod document;
mod error;
mod kb;

pub use config::LifecycleConfig;
pub use context::LifecycleContext;
pub use document::{confirm_upload, delete_document, list_documents, presign_upload, PresignedUpload};
pub use error::{LifecycleError, LifecycleResult};
pub use kb::{create_kb, delete_kb, describe_kb, list_kbs, update_kb, UpdateKbPatch};

pub const TRACING_TARGET: &str = "kbrag_lifecycle";
