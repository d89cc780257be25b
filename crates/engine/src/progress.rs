use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::counters::{CounterSnapshot, Counters};

/// Layout of the progress line timestamp.
pub const PROGRESS_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One emitted progress observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub success: u64,
    pub fail: u64,
    pub rps: f64,
}

impl ProgressSample {
    pub fn render(&self, at: DateTime<FixedOffset>) -> String {
        format!(
            "{} [Progress] Success: {}, Fail: {}, RPS: {:.2}",
            at.format(PROGRESS_TIMESTAMP_FORMAT),
            self.success,
            self.fail,
            self.rps
        )
    }
}

/// Interval throughput from successive counter snapshots.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    last: CounterSnapshot,
    last_at: Instant,
}

impl ProgressTracker {
    pub fn new(start: CounterSnapshot, at: Instant) -> Self {
        Self {
            last: start,
            last_at: at,
        }
    }

    /// Rate since the previous emitted sample.
    ///
    /// Returns `None` without moving the baseline when no time has passed,
    /// so the rate is always finite and non-negative.
    pub fn sample(&mut self, current: CounterSnapshot, now: Instant) -> Option<ProgressSample> {
        let elapsed = now.saturating_duration_since(self.last_at).as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }

        let delta = current.total().saturating_sub(self.last.total());
        let rps = delta as f64 / elapsed;

        self.last = current;
        self.last_at = now;

        Some(ProgressSample {
            success: current.success,
            fail: current.fail,
            rps,
        })
    }
}

/// Background task printing one progress line per interval.
#[derive(Debug)]
pub struct ProgressReporter {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ProgressReporter {
    pub fn spawn(counters: Arc<Counters>, interval: Duration, timezone: FixedOffset) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(report_loop(counters, interval, timezone, stop_rx));
        Self { stop_tx, handle }
    }

    /// Signal the reporter and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(err) = self.handle.await {
            warn!(error = %err, "progress reporter ended abnormally");
        }
    }
}

async fn report_loop(
    counters: Arc<Counters>,
    interval: Duration,
    timezone: FixedOffset,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut tracker = ProgressTracker::new(counters.snapshot(), Instant::now());
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut stop_rx => {
                debug!("progress reporter stopped");
                return;
            }
            _ = ticker.tick() => {
                if let Some(sample) = tracker.sample(counters.snapshot(), Instant::now()) {
                    println!("{}", sample.render(Utc::now().with_timezone(&timezone)));
                }
            }
        }
    }
}
