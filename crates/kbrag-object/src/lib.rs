#![forbid(unsafe_code)]
//! Object store gateway (C1): typed get/put/delete/presign over a blob
//! store, content-addressed by the keys in [`kbrag_core::object_keys`].

mod config;
mod error;
mod gateway;

pub use config::{FsConfig, S3Config, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use gateway::ObjectStoreGateway;

/// Tracing target for object store operations.
pub const TRACING_TARGET: &str = "kbrag_object";
