use std::time::Duration;

use cardboard_config::{DEFAULT_BASE_INTERVAL_MS, DEFAULT_MAX_INTERVAL_MS, PollSettings};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use crate::poll::diagnostics::PollFailure;

/// What a controller is started with.
///
/// `snapshot` is published once at activation. `endpoint` starts the poll
/// loop. Either, both, or neither may be set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub snapshot: Option<String>,
    pub endpoint: Option<String>,
    pub base_interval: Duration,
    pub max_interval: Duration,
}

impl PollConfig {
    /// Config with default timing and no source.
    pub fn new() -> Self {
        Self {
            snapshot: None,
            endpoint: None,
            base_interval: Duration::from_millis(DEFAULT_BASE_INTERVAL_MS),
            max_interval: Duration::from_millis(DEFAULT_MAX_INTERVAL_MS),
        }
    }

    /// Timing taken from a `[poll]` config block.
    pub fn from_settings(settings: &PollSettings) -> Self {
        Self {
            base_interval: settings.base_interval(),
            max_interval: settings.max_interval(),
            ..Self::new()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Observable view of the controller's internal state.
#[derive(Debug, Clone, Serialize)]
pub struct PollStatus {
    /// False once the controller has been deactivated.
    pub active: bool,
    /// Delay that will be (or was last) used to schedule the next cycle.
    #[serde(serialize_with = "serialize_millis")]
    pub interval: Duration,
    /// Whether a scheduled cycle is pending. Never more than one.
    pub timer_pending: bool,
    /// When the pending cycle is due.
    #[serde(skip)]
    pub next_cycle_at: Option<Instant>,
    /// Whether a request is outstanding.
    pub in_flight: bool,
    pub consecutive_failures: u32,
    /// Number of fetches issued.
    pub cycles: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure: Option<PollFailure>,
}

impl PollStatus {
    pub(crate) fn initial(interval: Duration) -> Self {
        Self {
            active: true,
            interval,
            timer_pending: false,
            next_cycle_at: None,
            in_flight: false,
            consecutive_failures: 0,
            cycles: 0,
            last_success_at: None,
            last_failure: None,
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(duration_millis(*value))
}
