//! Polling data acquisition: backoff, timers, and the controller loop.

pub mod backoff;
pub mod controller;
pub mod diagnostics;
pub mod errors;
mod timer;
pub mod types;

pub use backoff::Backoff;
pub use controller::PollController;
pub use diagnostics::{DiagnosticsSink, PollFailure, RecordingDiagnostics, TracingDiagnostics};
pub use errors::PollError;
pub use types::{PollConfig, PollStatus, duration_millis};
