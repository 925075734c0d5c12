//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── command: Command          # serve-worker | serve-query
//! ├── postgres: PostgresArgs    # metadata store
//! ├── storage: StorageArgs      # object store backend
//! ├── queue: QueueConfig        # NATS JetStream (from kbrag-queue's own Args)
//! └── models: ModelArgs         # embedding/generation provider selection
//! ```
//!
//! Every group can be set via CLI flags or environment variables; `.env`
//! files are loaded before parsing so its values act as env fallbacks too.

mod models;
mod postgres;
mod storage;

use clap::{Parser, Subcommand};
pub use models::{ModelArgs, ModelProviderKind};
pub use postgres::PostgresArgs;
pub use storage::{StorageArgs, StorageBackendKind};

use kbrag_queue::QueueConfig;

/// Knowledge-base RAG service composition root.
#[derive(Debug, Parser)]
#[command(name = "kbrag")]
#[command(about = "Knowledge base indexing and retrieval service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(flatten)]
    pub postgres: PostgresArgs,

    #[clap(flatten)]
    pub storage: StorageArgs,

    #[clap(flatten)]
    pub queue: QueueConfig,

    #[clap(flatten)]
    pub models: ModelArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs the indexing worker loop (C8): consumes jobs, parses, chunks,
    /// embeds, and merges into each KB's index.
    ServeWorker,
    /// Runs a single ad hoc query against a knowledge base (C9), printing
    /// the answer and its sources to stdout.
    ServeQuery {
        /// Knowledge base to query.
        #[arg(long)]
        kb_id: uuid::Uuid,
        /// Owner performing the query.
        #[arg(long)]
        owner_id: uuid::Uuid,
        /// The question text.
        #[arg(long)]
        query: String,
    },
}

impl Cli {
    /// Loads `.env` (if present) and parses CLI arguments/environment.
    pub fn init() -> Self {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("warning: failed to load .env file: {err}");
        }
        Self::parse()
    }
}
