//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.cardboard/config.toml`
//! 3. **Project config** - `./.cardboard/config.toml`
//! 4. **CLI arguments** - Command-line flags (applied by the caller)

use std::fs;
use std::path::Path;

use cardboard_paths::CardboardPaths;
use tracing::debug;

use crate::errors::ConfigError;
use crate::types::{CardboardConfig, PollSettings, SourceConfig};

/// Load configuration from `~/.cardboard/config.toml` and `./.cardboard/config.toml`.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be read or parsed. Missing
/// config files are not errors. The result is not validated: callers apply
/// CLI overrides first and then call [`CardboardConfig::validate`].
pub fn load_hierarchy() -> Result<CardboardConfig, ConfigError> {
    let paths = CardboardPaths::resolve().map_err(|e| ConfigError::InvalidConfiguration {
        message: e.to_string(),
    })?;
    let project_root = std::env::current_dir()?;
    load_hierarchy_from(&paths, &project_root)
}

/// Load the hierarchy with explicit locations. Used by `load_hierarchy` and tests.
pub fn load_hierarchy_from(
    paths: &CardboardPaths,
    project_root: &Path,
) -> Result<CardboardConfig, ConfigError> {
    let mut config = CardboardConfig::default();

    if let Some(user_config) = load_config_file(&paths.user_config())? {
        config = merge_configs(config, user_config);
    }

    if let Some(project_config) =
        load_config_file(&CardboardPaths::project_config(project_root))?
    {
        config = merge_configs(config, project_config);
    }

    Ok(config)
}

/// Load a configuration file. Returns `Ok(None)` when the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<CardboardConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(event = "config.load.file_missing", path = %path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::IoError {
                source: std::io::Error::new(e.kind(), format!("'{}': {}", path.display(), e)),
            });
        }
    };

    let config = toml::from_str::<CardboardConfig>(&content).map_err(|e| {
        ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })?;

    debug!(event = "config.load.file_loaded", path = %path.display());
    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Source fields are merged individually, so a project can point at its own
/// endpoint while inheriting the user's `base_url`.
pub fn merge_configs(base: CardboardConfig, override_config: CardboardConfig) -> CardboardConfig {
    CardboardConfig {
        source: SourceConfig {
            endpoint: override_config.source.endpoint.or(base.source.endpoint),
            base_url: override_config.source.base_url.or(base.source.base_url),
            snapshot_file: override_config
                .source
                .snapshot_file
                .or(base.source.snapshot_file),
            snapshot: override_config.source.snapshot.or(base.source.snapshot),
        },
        poll: PollSettings::merge(&base.poll, &override_config.poll),
    }
}
