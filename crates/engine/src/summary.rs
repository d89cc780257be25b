use std::fmt;
use std::time::Duration;

/// Final totals for a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub success: u64,
    pub fail: u64,
    /// Attempts the workers report having made.
    pub issued: u64,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> u64 {
        self.success + self.fail
    }

    /// Overall throughput; `None` when no measurable time elapsed.
    pub fn average_rps(&self) -> Option<f64> {
        let seconds = self.elapsed.as_secs_f64();
        (seconds > 0.0).then(|| self.total() as f64 / seconds)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, Success: {}, Fail: {}",
            self.total(),
            self.success,
            self.fail
        )?;
        if let Some(rps) = self.average_rps() {
            write!(f, "\nAverage RPS: {rps:.2}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_totals_and_average() {
        let summary = RunSummary {
            success: 90,
            fail: 10,
            issued: 100,
            elapsed: Duration::from_secs(4),
        };
        assert_eq!(
            summary.to_string(),
            "Total: 100, Success: 90, Fail: 10\nAverage RPS: 25.00"
        );
    }

    #[test]
    fn zero_elapsed_omits_average() {
        let summary = RunSummary {
            success: 0,
            fail: 0,
            issued: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(summary.average_rps(), None);
        assert_eq!(summary.to_string(), "Total: 0, Success: 0, Fail: 0");
    }
}
