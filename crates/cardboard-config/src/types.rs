//! Configuration types for cardboard.
//!
//! Every field is optional so that user and project files can be merged
//! field-by-field. Accessors apply the built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay before the next cycle after a success.
pub const DEFAULT_BASE_INTERVAL_MS: u64 = 2_000;

/// Upper bound for the backoff interval.
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 180_000;

/// Per-request timeout applied by the HTTP fetcher. `0` disables it.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Top-level configuration, read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardboardConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub poll: PollSettings,
}

/// Where cards come from: `[source]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint polled for `{ "items": [...] }`. Absolute URL, or a path
    /// starting with `/` combined with `base_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Origin used to resolve a path-only `endpoint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// File holding a static JSON array of cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_file: Option<PathBuf>,

    /// Inline static JSON array of cards. Wins over `snapshot_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

impl SourceConfig {
    /// The endpoint with `base_url` applied when the endpoint is path-only.
    pub fn resolved_endpoint(&self) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?;
        match (endpoint.starts_with('/'), self.base_url.as_deref()) {
            (true, Some(base)) => Some(format!("{}{}", base.trim_end_matches('/'), endpoint)),
            _ => Some(endpoint.to_string()),
        }
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some() || self.snapshot_file.is_some()
    }
}

/// Poll timing: `[poll]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interval_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl PollSettings {
    pub fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_interval_ms.unwrap_or(DEFAULT_BASE_INTERVAL_MS))
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms.unwrap_or(DEFAULT_MAX_INTERVAL_MS))
    }

    /// `None` when the timeout is disabled with `request_timeout_ms = 0`.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Merge two settings blocks, preferring fields set in `override_settings`.
    pub fn merge(base: &Self, override_settings: &Self) -> Self {
        Self {
            base_interval_ms: override_settings.base_interval_ms.or(base.base_interval_ms),
            max_interval_ms: override_settings.max_interval_ms.or(base.max_interval_ms),
            request_timeout_ms: override_settings
                .request_timeout_ms
                .or(base.request_timeout_ms),
        }
    }
}
