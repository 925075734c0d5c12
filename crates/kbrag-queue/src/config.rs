//! NATS connection configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

const DEFAULT_NAME: &str = "kbrag-queue";
const DEFAULT_MAX_RECONNECTS: usize = 10;
const DEFAULT_RECONNECT_DELAY_SECS: u64 = 2;
const DEFAULT_ACK_WAIT_SECS: u64 = 300;
const DEFAULT_MAX_DELIVER: i64 = 5;

/// Connection and stream configuration for the indexing job queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct QueueConfig {
    /// NATS server URL(s), comma-separated for clustering.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "NATS_URL", default_value = "nats://127.0.0.1:4222")
    )]
    pub url: String,

    /// Client connection name, shown in NATS server monitoring.
    #[cfg_attr(feature = "config", arg(long, env = "NATS_CLIENT_NAME"))]
    pub name: Option<String>,

    /// Maximum time to wait for the initial connection, in seconds.
    #[cfg_attr(feature = "config", arg(long, env = "NATS_CONNECT_TIMEOUT_SECS"))]
    pub connect_timeout_secs: Option<u64>,

    /// Maximum reconnection attempts (0 means unlimited).
    #[cfg_attr(feature = "config", arg(long, env = "NATS_MAX_RECONNECTS"))]
    pub max_reconnects: Option<usize>,

    /// Delay between reconnection attempts, in seconds.
    #[cfg_attr(feature = "config", arg(long, env = "NATS_RECONNECT_DELAY_SECS"))]
    pub reconnect_delay_secs: Option<u64>,

    /// How long the server waits for an ack before redelivering a job.
    #[cfg_attr(feature = "config", arg(long, env = "QUEUE_ACK_WAIT_SECS"))]
    pub ack_wait_secs: Option<u64>,

    /// Maximum redelivery attempts before a job is dead-lettered.
    #[cfg_attr(feature = "config", arg(long, env = "QUEUE_MAX_DELIVER"))]
    pub max_deliver: Option<i64>,
}

impl QueueConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            connect_timeout_secs: None,
            max_reconnects: None,
            reconnect_delay_secs: None,
            ack_wait_secs: None,
            max_deliver: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Splits `url` on commas into individual server URLs.
    pub fn servers(&self) -> Vec<&str> {
        self.url.split(',').map(str::trim).collect()
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.unwrap_or(10))
    }

    #[inline]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(
            self.reconnect_delay_secs
                .unwrap_or(DEFAULT_RECONNECT_DELAY_SECS),
        )
    }

    #[inline]
    pub fn max_reconnects_option(&self) -> Option<usize> {
        let max = self.max_reconnects.unwrap_or(DEFAULT_MAX_RECONNECTS);
        if max == 0 { None } else { Some(max) }
    }

    #[inline]
    pub fn ack_wait(&self) -> Duration {
        Duration::from_secs(self.ack_wait_secs.unwrap_or(DEFAULT_ACK_WAIT_SECS))
    }

    #[inline]
    pub fn max_deliver(&self) -> i64 {
        self.max_deliver.unwrap_or(DEFAULT_MAX_DELIVER)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_max_reconnects(mut self, max_reconnects: usize) -> Self {
        self.max_reconnects = Some(max_reconnects);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let servers = self.servers();
        if servers.is_empty() || servers.iter().any(|s| s.is_empty()) {
            return Err("at least one non-empty server URL must be provided".to_string());
        }
        for server in &servers {
            if !server.starts_with("nats://") && !server.starts_with("tls://") {
                return Err(format!("invalid server URL format: {server}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_defaults() {
        let config = QueueConfig::new("nats://localhost:4222");
        assert_eq!(config.servers(), vec!["nats://localhost:4222"]);
        assert_eq!(config.name(), DEFAULT_NAME);
        assert_eq!(config.max_reconnects_option(), Some(DEFAULT_MAX_RECONNECTS));
        assert_eq!(config.ack_wait(), Duration::from_secs(DEFAULT_ACK_WAIT_SECS));
        assert_eq!(config.max_deliver(), DEFAULT_MAX_DELIVER);
    }

    #[test]
    fn unlimited_reconnects_is_zero() {
        let config = QueueConfig::new("nats://localhost:4222").with_max_reconnects(0);
        assert_eq!(config.max_reconnects_option(), None);
    }

    #[test]
    fn validate_rejects_bad_scheme() {
        let config = QueueConfig::new("http://localhost:4222");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_url() {
        let config = QueueConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn multiple_servers_split_on_comma() {
        let config = QueueConfig::new("nats://a:4222, nats://b:4222");
        assert_eq!(config.servers(), vec!["nats://a:4222", "nats://b:4222"]);
    }
}
