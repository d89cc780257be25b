use std::time::Duration;

use phantomflow_events::synthesize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;
use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::errors::Result;

/// Odd 64-bit constant; multiplying by it is a bijection on `u64`.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derive a worker's generator seed from the run's base seed.
///
/// Distinct indices always map to distinct seeds for the same base.
pub fn worker_seed(base: u64, index: usize) -> u64 {
    base.wrapping_add((index as u64).wrapping_add(1).wrapping_mul(SEED_STRIDE))
}

/// When a worker stops: after `quota` attempts, after `deadline`, or at
/// whichever comes first when both are set. With neither it never stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopCondition {
    pub quota: Option<u64>,
    pub deadline: Option<Duration>,
}

impl StopCondition {
    pub fn new(quota: Option<u64>, deadline: Option<Duration>) -> Self {
        Self { quota, deadline }
    }

    pub fn is_unbounded(&self) -> bool {
        self.quota.is_none() && self.deadline.is_none()
    }

    pub fn should_stop(&self, sent: u64, elapsed: Duration) -> bool {
        if let Some(quota) = self.quota {
            if sent >= quota {
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if elapsed >= deadline {
                return true;
            }
        }
        false
    }
}

/// What one worker did before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub index: usize,
    pub sent: u64,
}

/// Synthesize and dispatch events one at a time until `stop` is met.
///
/// Every attempt counts toward the quota whatever its outcome, so an
/// unreachable target still ends a request-bounded run.
pub async fn run_worker(
    index: usize,
    seed: u64,
    stop: StopCondition,
    dispatcher: Dispatcher,
) -> Result<WorkerReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let started = Instant::now();
    let cutoff = stop.deadline.map(|deadline| started + deadline);
    let mut sent = 0u64;

    while !stop.should_stop(sent, started.elapsed()) {
        let event = synthesize(&mut rng);
        dispatcher.dispatch(&event, cutoff).await?;
        sent += 1;
    }

    debug!(worker = index, sent, elapsed = ?started.elapsed(), "worker stopped");
    Ok(WorkerReport { index, sent })
}
