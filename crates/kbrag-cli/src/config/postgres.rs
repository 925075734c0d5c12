//! Postgres connection arguments, mirroring `nvisy-postgres::PgConfig`'s
//! shape but parseable directly off the command line.

use clap::Args;
use kbrag_postgres::PgConfig;

#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct PostgresArgs {
    /// Postgres connection string.
    #[arg(long, env = "POSTGRES_URL")]
    pub postgres_url: String,

    /// Maximum size of the connection pool.
    #[arg(long, env = "POSTGRES_MAX_CONNECTIONS", default_value_t = 10)]
    pub postgres_max_connections: u32,

    /// Seconds to wait for a new connection before giving up.
    #[arg(long, env = "POSTGRES_CONNECTION_TIMEOUT_SECS")]
    pub postgres_connection_timeout_secs: Option<u64>,

    /// Seconds an idle pooled connection may sit before being recycled.
    #[arg(long, env = "POSTGRES_IDLE_TIMEOUT_SECS")]
    pub postgres_idle_timeout_secs: Option<u64>,
}

impl From<PostgresArgs> for PgConfig {
    fn from(args: PostgresArgs) -> Self {
        let mut config = PgConfig::new(args.postgres_url)
            .with_max_connections(args.postgres_max_connections);
        if let Some(secs) = args.postgres_connection_timeout_secs {
            config = config.with_connection_timeout_secs(secs);
        }
        if let Some(secs) = args.postgres_idle_timeout_secs {
            config = config.with_idle_timeout_secs(secs);
        }
        config
    }
}
