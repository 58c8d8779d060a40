//! Failure reporting for the poll loop.
//!
//! Every failed cycle produces one [`PollFailure`], handed to the injected
//! [`DiagnosticsSink`]. Failures never stop the loop; the sink is purely an
//! observation channel.

use std::sync::Mutex;

use serde::Serialize;
use tracing::warn;

/// Why a poll cycle failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PollFailure {
    /// The endpoint answered with a non-2xx status.
    #[error("failed with non-success status {status} for endpoint {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// The endpoint answered 2xx but the body was not `{ "items": [...] }`.
    #[error("malformed payload from endpoint {endpoint}: {detail}")]
    Malformed { endpoint: String, detail: String },

    /// The request could not complete.
    #[error("error fetching from endpoint {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },
}

impl PollFailure {
    pub fn endpoint(&self) -> &str {
        match self {
            PollFailure::Status { endpoint, .. }
            | PollFailure::Malformed { endpoint, .. }
            | PollFailure::Transport { endpoint, .. } => endpoint,
        }
    }

    /// Stable event name used in structured logs.
    pub fn event_name(&self) -> &'static str {
        match self {
            PollFailure::Status { .. } => "core.poll.fetch_status_failed",
            PollFailure::Malformed { .. } => "core.poll.payload_malformed",
            PollFailure::Transport { .. } => "core.poll.fetch_request_failed",
        }
    }
}

/// Receives poll failures.
pub trait DiagnosticsSink: Send + Sync + 'static {
    fn report(&self, failure: &PollFailure);
}

/// Default sink: one structured `warn!` per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn report(&self, failure: &PollFailure) {
        match failure {
            PollFailure::Status { endpoint, status } => {
                warn!(
                    event = "core.poll.fetch_status_failed",
                    endpoint = %endpoint,
                    status = status,
                    "{}",
                    failure
                );
            }
            PollFailure::Malformed { endpoint, detail } => {
                warn!(
                    event = "core.poll.payload_malformed",
                    endpoint = %endpoint,
                    error = %detail,
                    "{}",
                    failure
                );
            }
            PollFailure::Transport { endpoint, detail } => {
                warn!(
                    event = "core.poll.fetch_request_failed",
                    endpoint = %endpoint,
                    error = %detail,
                    "{}",
                    failure
                );
            }
        }
    }
}

/// Sink that keeps every failure in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    failures: Mutex<Vec<PollFailure>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All failures reported so far, oldest first.
    pub fn failures(&self) -> Vec<PollFailure> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.failures.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn report(&self, failure: &PollFailure) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(failure.clone());
        }
    }
}
