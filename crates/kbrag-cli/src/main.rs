#![forbid(unsafe_code)]
//! Composition root for the knowledge-base RAG service: wires the C1-C10
//! crates together into two runnable modes, `serve-worker` and
//! `serve-query`. Does not implement HTTP transport, auth, or multi-tenant
//! entitlement (out of scope).

mod config;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kbrag_core::types::{GenerationParams, QueryRequest};
use kbrag_coordinator::IndexCoordinator;
use kbrag_object::ObjectStoreGateway;
use kbrag_postgres::PgConfig;
use kbrag_queue::{IndexingJobSubscriber, QueueClient};
use kbrag_query::{query, QueryContext};
use kbrag_worker::{run as run_worker, WorkerConfig, WorkerContext};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Command};

pub const TRACING_TARGET_STARTUP: &str = "kbrag_cli::startup";

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(target: TRACING_TARGET_STARTUP, error = ?err, "kbrag terminated with error");
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    log_startup(&cli);

    let pg_config: PgConfig = cli.postgres.clone().into();
    let pg = pg_config.build().context("failed to build postgres client")?;

    let storage_config = cli.storage.build()?;
    let objects = ObjectStoreGateway::new(&storage_config).context("failed to build object store gateway")?;

    let queue_client = QueueClient::connect(cli.queue.clone())
        .await
        .context("failed to connect to NATS")?;

    match cli.command {
        Command::ServeWorker => {
            let models = cli
                .models
                .build_gateway()
                .await
                .context("failed to initialize model gateway")?;
            let coordinator = IndexCoordinator::new(pg.clone(), objects.clone());
            let ctx = Arc::new(WorkerContext::new(pg, objects, models, coordinator));
            let subscriber = IndexingJobSubscriber::new(&queue_client, "kbrag-worker")
                .await
                .context("failed to create job subscriber")?;

            tracing::info!(target: TRACING_TARGET_STARTUP, "starting indexing worker loop");
            run_worker(ctx, subscriber, WorkerConfig::default())
                .await
                .context("worker loop terminated")?;
        }
        Command::ServeQuery { kb_id, owner_id, query: question } => {
            let models = cli
                .models
                .build_gateway()
                .await
                .context("failed to initialize model gateway")?;
            let ctx = QueryContext::new(pg, objects, models);

            let request = QueryRequest {
                kb_id,
                owner_id,
                query: question,
                model_id: cli.models.generation_model_id.clone(),
                k: 5,
                history: Vec::new(),
                params: GenerationParams::default(),
                distance_threshold: None,
            };

            let response = query(&ctx, &request).await.context("query failed")?;
            println!("{}", response.answer);
            if !response.sources.is_empty() {
                println!("\nSources:");
                for source in &response.sources {
                    println!("  - {source}");
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_startup(cli: &Cli) {
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        command = ?cli.command,
        "starting kbrag"
    );
}
