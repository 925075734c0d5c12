#![forbid(unsafe_code)]
//! Metadata store gateway (C2): typed, conditionally-updatable Postgres
//! rows for knowledge bases and documents, grounded on `nvisy-postgres`.

pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

pub const TRACING_TARGET_CLIENT: &str = "kbrag_postgres::client";
pub const TRACING_TARGET_QUERY: &str = "kbrag_postgres::query";
pub const TRACING_TARGET_MIGRATION: &str = "kbrag_postgres::migration";
pub const TRACING_TARGET_CONNECTION: &str = "kbrag_postgres::connection";

mod client;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use client::{
    ConnectionPool, MigrationResult, PgClient, PgConfig, PgConn, PgPoolStatus, PooledConnection,
    ping, run_pending_migrations,
};
pub use error::{PgError, PgResult};

mod error;
