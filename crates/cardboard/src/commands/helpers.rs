use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{debug, warn};

use cardboard_config::{CardboardConfig, SourceConfig};

/// Load configuration with warning on errors.
///
/// The result is unvalidated; callers apply CLI overrides and then validate.
/// Falls back to defaults only if a file cannot be read or parsed, and
/// notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
pub fn load_config_with_warning() -> CardboardConfig {
    match CardboardConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                crate::color::warning(&format!(
                    "Warning: Could not load config: {}. Using defaults.",
                    e
                ))
            );
            eprintln!(
                "{}",
                crate::color::hint(
                    "Tip: Check ~/.cardboard/config.toml and ./.cardboard/config.toml for syntax errors."
                )
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            CardboardConfig::default()
        }
    }
}

/// Apply `--snapshot` / `--snapshot-file`. A CLI source replaces both config sources.
pub fn apply_snapshot_overrides(source: &mut SourceConfig, matches: &ArgMatches) {
    if let Some(text) = matches.get_one::<String>("snapshot") {
        source.snapshot = Some(text.clone());
        source.snapshot_file = None;
    } else if let Some(path) = matches.get_one::<PathBuf>("snapshot-file") {
        source.snapshot_file = Some(path.clone());
        source.snapshot = None;
    }
}

/// Apply `--endpoint` / `--base-url`.
pub fn apply_endpoint_overrides(source: &mut SourceConfig, matches: &ArgMatches) {
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        source.endpoint = Some(endpoint.clone());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        source.base_url = Some(base_url.clone());
    }
}

/// Snapshot text from the source config. Inline text wins over the file.
///
/// A relative `snapshot_file` resolves against the current directory.
pub fn read_snapshot(source: &SourceConfig) -> Result<Option<String>, String> {
    if let Some(text) = &source.snapshot {
        return Ok(Some(text.clone()));
    }
    let Some(path) = &source.snapshot_file else {
        return Ok(None);
    };
    debug!(event = "cli.snapshot.read_started", path = %path.display());
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| format!("Could not read snapshot file {}: {}", path.display(), e))
}
