//! NATS client connection management.

use async_nats::{ConnectOptions, jetstream};
use tokio::time::timeout;
use tracing::{info, instrument};

use crate::config::QueueConfig;
use crate::error::{QueueError, QueueResult};
use crate::TRACING_TARGET_CLIENT;

/// Connected NATS client with a JetStream context attached.
#[derive(Debug, Clone)]
pub struct QueueClient {
    jetstream: jetstream::Context,
    config: QueueConfig,
}

impl QueueClient {
    /// Connects to NATS and initializes the JetStream context.
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT)]
    pub async fn connect(config: QueueConfig) -> QueueResult<Self> {
        config
            .validate()
            .map_err(QueueError::Config)?;

        let mut connect_opts = ConnectOptions::new()
            .name(config.name())
            .connection_timeout(config.connect_timeout());

        if let Some(max_reconnects) = config.max_reconnects_option() {
            connect_opts = connect_opts.max_reconnects(max_reconnects);
        } else {
            connect_opts = connect_opts.max_reconnects(None);
        }

        let servers = config.servers().join(",");
        let client = timeout(
            config.connect_timeout(),
            async_nats::connect_with_options(&servers, connect_opts),
        )
        .await
        .map_err(|_| QueueError::Timeout {
            timeout: config.connect_timeout(),
        })?
        .map_err(|err| QueueError::Connection(Box::new(err)))?;

        let jetstream = jetstream::new(client);

        info!(
            target: TRACING_TARGET_CLIENT,
            servers = %servers,
            name = config.name(),
            "connected to NATS"
        );

        Ok(Self { jetstream, config })
    }

    pub fn jetstream(&self) -> &jetstream::Context {
        &self.jetstream
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }
}
