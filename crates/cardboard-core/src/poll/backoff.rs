use std::time::Duration;

/// Exponential backoff between poll cycles.
///
/// Starts at `base`, doubles on every failure up to `max`, and snaps back to
/// `base` on success. After `n` consecutive failures the delay is
/// `min(base * 2^n, max)`.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Record a failure. Returns the new delay.
    pub fn grow(&mut self) -> Duration {
        self.current = self.current.saturating_mul(2).min(self.max);
        self.current
    }

    /// Record a success.
    pub fn reset(&mut self) {
        self.current = self.base;
    }
}
