//! # cardboard-config
//!
//! TOML configuration types, loading, and validation for cardboard.
//! Depends only on `cardboard-paths`.

mod loading;
mod validation;

pub mod errors;
pub mod types;

// Public API re-exports
pub use errors::ConfigError;
pub use loading::{load_config_file, load_hierarchy, load_hierarchy_from, merge_configs};
pub use types::{
    CardboardConfig, DEFAULT_BASE_INTERVAL_MS, DEFAULT_MAX_INTERVAL_MS,
    DEFAULT_REQUEST_TIMEOUT_MS, PollSettings, SourceConfig,
};
pub use validation::validate_config;

impl CardboardConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }
}
