use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Utc};
use reqwest::Url;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::counters::Counters;
use crate::dispatcher::Dispatcher;
use crate::errors::{EngineError, Result};
use crate::pool::{ConnectionGate, PoolConfig};
use crate::progress::ProgressReporter;
use crate::settings::RunConfig;
use crate::summary::RunSummary;
use crate::timezone::resolve_timezone;
use crate::worker::{run_worker, worker_seed, StopCondition};

/// Default worker count: two per available processing unit.
pub fn default_worker_count() -> usize {
    num_cpus::get().max(1) * 2
}

/// The bound and fan-out of one run, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub endpoint: String,
    /// Total attempts across all workers; 0 means no count bound.
    pub total_requests: u64,
    /// Per-worker time bound; zero means no time bound.
    pub duration: Duration,
    pub workers: usize,
}

impl RunPlan {
    /// Each worker's share of the request budget.
    ///
    /// Integer division: the remainder `total_requests % workers` is never
    /// issued, so a run may fall short by up to `workers - 1` attempts.
    pub fn per_worker_quota(&self) -> Option<u64> {
        (self.total_requests > 0 && self.workers > 0)
            .then(|| self.total_requests / self.workers as u64)
    }

    pub fn stop_condition(&self) -> StopCondition {
        let deadline = (!self.duration.is_zero()).then_some(self.duration);
        StopCondition::new(self.per_worker_quota(), deadline)
    }
}

/// Owns the shared pool configuration and counters, and drives the workers.
#[derive(Debug)]
pub struct LoadGenerator {
    plan: RunPlan,
    endpoint: Url,
    pool: PoolConfig,
    report_interval: Duration,
    timezone: FixedOffset,
    seed: Option<u64>,
    counters: Arc<Counters>,
}

impl LoadGenerator {
    /// Validate everything a run needs before any worker exists.
    pub fn new(plan: RunPlan, config: &RunConfig) -> Result<Self> {
        config.validate()?;
        if plan.workers == 0 {
            return Err(EngineError::InvalidConfig(
                "worker count must be greater than zero".to_string(),
            ));
        }

        let endpoint = parse_endpoint(&plan.endpoint)?;
        let timezone = resolve_timezone(&config.report.timezone)?;

        Ok(Self {
            plan,
            endpoint,
            pool: PoolConfig::from(&config.pool),
            report_interval: config.report.interval(),
            timezone,
            seed: config.seed,
            counters: Arc::new(Counters::new()),
        })
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    pub fn pool(&self) -> &PoolConfig {
        &self.pool
    }

    /// Shared counters, for observers that run beside the pool.
    ///
    /// They accumulate over every run of this generator; each [`RunSummary`]
    /// covers only its own run.
    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }

    /// Run every worker to its stop condition and return the totals.
    pub async fn run(&self) -> Result<RunSummary> {
        let client = self.pool.build_client()?;
        let dispatcher = Dispatcher::new(
            client,
            self.endpoint.clone(),
            ConnectionGate::new(&self.pool),
            self.counters(),
        );

        let stop = self.plan.stop_condition();
        if stop.is_unbounded() {
            warn!("neither a request count nor a duration is set; running until interrupted");
        }

        let baseline = self.counters.snapshot();
        let started = Instant::now();
        let reporter = ProgressReporter::spawn(self.counters(), self.report_interval, self.timezone);

        let base_seed = self.seed.unwrap_or_else(spawn_timestamp_nanos);
        info!(
            endpoint = %self.endpoint,
            workers = self.plan.workers,
            quota = ?stop.quota,
            deadline = ?stop.deadline,
            base_seed,
            "spawning workers"
        );

        let mut workers = JoinSet::new();
        for index in 0..self.plan.workers {
            workers.spawn(run_worker(
                index,
                worker_seed(base_seed, index),
                stop,
                dispatcher.clone(),
            ));
        }

        let mut issued = 0u64;
        let mut failure: Option<EngineError> = None;
        while let Some(joined) = workers.join_next().await {
            let result = joined.map_err(EngineError::from).and_then(|report| report);
            match result {
                Ok(report) => issued += report.sent,
                Err(err) if failure.is_none() => {
                    warn!(error = %err, "aborting run");
                    workers.abort_all();
                    failure = Some(err);
                }
                Err(_) => {}
            }
        }

        let elapsed = started.elapsed();
        reporter.stop().await;
        if let Some(err) = failure {
            return Err(err);
        }

        let totals = self.counters.snapshot().since(baseline);
        info!(issued, success = totals.success, fail = totals.fail, ?elapsed, "run complete");

        Ok(RunSummary {
            success: totals.success,
            fail: totals.fail,
            issued,
            elapsed,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let invalid = |reason: String| EngineError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other:?}"))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn spawn_timestamp_nanos() -> u64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64
}
