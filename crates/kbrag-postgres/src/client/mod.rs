mod custom_hooks;
mod migrate;
mod pg_client;
mod pg_config;

pub use migrate::{MigrationResult, run_pending_migrations};
pub use pg_client::{ConnectionPool, PgClient, PgConn, PgPoolStatus, PooledConnection, ping};
pub use pg_config::PgConfig;
