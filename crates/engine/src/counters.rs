use std::sync::atomic::{AtomicU64, Ordering};

/// Classification of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Fail,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Fail => "fail",
        }
    }
}

/// Run-wide success/fail tallies shared by every worker and reporter.
///
/// Only increment and load are ever performed, so each field is monotonic.
/// The two fields are read independently: a snapshot may pair values taken
/// at slightly different instants.
#[derive(Debug, Default)]
pub struct Counters {
    success: AtomicU64,
    fail: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed attempt.
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Success => &self.success,
            Outcome::Fail => &self.fail,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn success(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn fail(&self) -> u64 {
        self.fail.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            success: self.success(),
            fail: self.fail(),
        }
    }
}

/// Point-in-time copy of [`Counters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub success: u64,
    pub fail: u64,
}

impl CounterSnapshot {
    pub fn total(&self) -> u64 {
        self.success + self.fail
    }

    /// Tallies added since `earlier` was taken.
    pub fn since(&self, earlier: CounterSnapshot) -> CounterSnapshot {
        CounterSnapshot {
            success: self.success.saturating_sub(earlier.success),
            fail: self.fail.saturating_sub(earlier.fail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn since_reports_only_the_new_tallies() {
        let counters = Counters::new();
        counters.record(Outcome::Success);
        counters.record(Outcome::Fail);
        let baseline = counters.snapshot();

        counters.record(Outcome::Success);
        counters.record(Outcome::Success);
        let delta = counters.snapshot().since(baseline);
        assert_eq!(delta, CounterSnapshot { success: 2, fail: 0 });
        assert_eq!(delta.total(), 2);
    }

    #[test]
    fn record_routes_to_matching_counter() {
        let counters = Counters::new();
        counters.record(Outcome::Success);
        counters.record(Outcome::Fail);
        counters.record(Outcome::Fail);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.success, 1);
        assert_eq!(snapshot.fail, 2);
        assert_eq!(snapshot.total(), 3);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let counters = Arc::new(Counters::new());
        let threads: Vec<_> = (0..8)
            .map(|i| {
                let counters = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for n in 0..10_000 {
                        let outcome = if (i + n) % 2 == 0 {
                            Outcome::Success
                        } else {
                            Outcome::Fail
                        };
                        counters.record(outcome);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.total(), 80_000);
        assert_eq!(snapshot.success, 40_000);
    }
}
