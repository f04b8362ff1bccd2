use std::time::Duration;

/// Poll delay that doubles with each consecutive failure, up to `max`.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    base: Duration,
    max: Duration,
    failures: u32,
}

impl PollBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            failures: 0,
        }
    }

    pub fn next_delay(&self) -> Duration {
        self.base
            .saturating_mul(2u32.saturating_pow(self.failures))
            .min(self.max)
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    /// Returns the length of the current failure streak.
    pub fn record_failure(&mut self) -> u32 {
        self.failures = self.failures.saturating_add(1);
        self.failures
    }
}
