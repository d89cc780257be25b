use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::Instant;
use tracing::debug;

use crate::errors::{EngineError, Result};
use crate::settings::PoolSettings;

/// Immutable connection pool configuration for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_idle_per_host: usize,
    pub max_connections_per_host: usize,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
    pub keepalive: Duration,
    pub request_timeout: Duration,
}

impl From<&PoolSettings> for PoolConfig {
    fn from(settings: &PoolSettings) -> Self {
        Self {
            max_idle_per_host: settings.max_idle_per_host,
            max_connections_per_host: settings.max_connections_per_host,
            idle_timeout: Duration::from_millis(settings.idle_timeout_ms),
            connect_timeout: Duration::from_millis(settings.connect_timeout_ms),
            keepalive: Duration::from_millis(settings.keepalive_ms),
            request_timeout: Duration::from_millis(settings.request_timeout_ms),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from(&PoolSettings::default())
    }
}

impl PoolConfig {
    /// Build the single client every worker shares.
    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            .http1_only()
            .pool_max_idle_per_host(self.max_idle_per_host)
            .pool_idle_timeout(self.idle_timeout)
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(self.keepalive)
            .timeout(self.request_timeout)
            .build()
            .map_err(EngineError::ClientBuild)
    }
}

/// Caps in-flight requests per target at `max_connections_per_host`.
///
/// A caller that cannot get a slot within the connect timeout gives up, so a
/// saturated pool surfaces as failed attempts instead of an unbounded queue.
/// The wait also ends at the caller's cutoff, so queueing for a slot never
/// carries a worker past its deadline.
#[derive(Debug, Clone)]
pub struct ConnectionGate {
    slots: Arc<Semaphore>,
    wait_limit: Duration,
}

impl ConnectionGate {
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(config.max_connections_per_host)),
            wait_limit: config.connect_timeout,
        }
    }

    /// Wait for a free slot; `None` when the wait limit or `cutoff` passes
    /// first. A free slot is still taken when the cutoff has already passed.
    pub async fn admit(&self, cutoff: Option<Instant>) -> Option<SemaphorePermit<'_>> {
        let wait = match cutoff {
            Some(cutoff) => self
                .wait_limit
                .min(cutoff.saturating_duration_since(Instant::now())),
            None => self.wait_limit,
        };
        match tokio::time::timeout(wait, self.slots.acquire()).await {
            Ok(Ok(permit)) => Some(permit),
            Ok(Err(_closed)) => None,
            Err(_elapsed) => {
                debug!(?wait, "no connection slot available");
                None
            }
        }
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}
