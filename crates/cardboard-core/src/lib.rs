//! cardboard-core: polled content-card acquisition
//!
//! Keeps a list of display cards up to date from a static snapshot or a
//! remote endpoint polled with exponential backoff. Rendering is left to
//! callers, who read or subscribe to the published list.
//!
//! # Main Entry Points
//!
//! - [`poll`] - The poll controller, backoff, and failure diagnostics
//! - [`store`] - The display list published to renderers
//! - [`fetch`] - The fetch capability and its reqwest implementation
//! - [`cards`] - Card records and their JSON formats

pub mod cards;
pub mod errors;
pub mod fetch;
pub mod logging;
pub mod poll;
pub mod store;
pub mod test_support;

pub use cards::{CardData, ImageData, parse_payload, parse_snapshot};
pub use errors::{CardboardError, CardboardResult};
pub use fetch::{FetchError, FetchResponse, Fetcher, HttpFetcher};
pub use poll::{
    DiagnosticsSink, PollConfig, PollController, PollError, PollFailure, PollStatus,
    RecordingDiagnostics, TracingDiagnostics, duration_millis,
};
pub use store::{DisplayList, DisplayListStore};

// Re-export config types from cardboard-config
pub use cardboard_config::{CardboardConfig, ConfigError, PollSettings, SourceConfig};

// Re-export logging initialization
pub use logging::init_logging;
