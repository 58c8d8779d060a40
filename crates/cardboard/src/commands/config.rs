use std::path::PathBuf;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use cardboard_config::CardboardConfig;
use cardboard_core::duration_millis;
use cardboard_paths::CardboardPaths;

use super::helpers::load_config_with_warning;
use crate::color;

/// Merged config plus the values the poller will actually use.
#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    config: &'a CardboardConfig,
    resolved_endpoint: Option<String>,
    base_interval_ms: u64,
    max_interval_ms: u64,
    request_timeout_ms: Option<u64>,
    user_config: Option<PathBuf>,
    project_config: Option<PathBuf>,
}

impl<'a> EffectiveConfig<'a> {
    fn new(config: &'a CardboardConfig) -> Self {
        let user_config = CardboardPaths::resolve().ok().map(|p| p.user_config());
        let project_config = std::env::current_dir()
            .ok()
            .map(|root| CardboardPaths::project_config(&root));
        Self {
            config,
            resolved_endpoint: config.source.resolved_endpoint(),
            base_interval_ms: duration_millis(config.poll.base_interval()),
            max_interval_ms: duration_millis(config.poll.max_interval()),
            request_timeout_ms: config.poll.request_timeout().map(duration_millis),
            user_config,
            project_config,
        }
    }
}

pub(crate) fn handle_config_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.config_started", json_output = json_output);

    let config = load_config_with_warning();
    let effective = EffectiveConfig::new(&config);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&effective)?);
    } else {
        print_effective(&effective)?;
    }

    if let Err(e) = config.validate() {
        eprintln!("{}", color::error(&format!("Invalid configuration: {}", e)));
        error!(event = "cli.config_invalid", error = %e, code = e.error_code());
        return Err(e.into());
    }

    info!(event = "cli.config_completed");
    Ok(())
}

fn print_effective(effective: &EffectiveConfig<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let describe = |path: &Option<PathBuf>| match path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (not found)", path.display()),
        None => "-".to_string(),
    };

    println!("{}", color::bold("Config files:"));
    println!("   User:    {}", describe(&effective.user_config));
    println!("   Project: {}", describe(&effective.project_config));
    println!();

    println!("{}", color::bold("Effective poll settings:"));
    println!(
        "   Endpoint:         {}",
        effective.resolved_endpoint.as_deref().unwrap_or("-")
    );
    println!("   Base interval:    {} ms", effective.base_interval_ms);
    println!("   Max interval:     {} ms", effective.max_interval_ms);
    println!(
        "   Request timeout:  {}",
        effective
            .request_timeout_ms
            .map_or("disabled".to_string(), |ms| format!("{} ms", ms))
    );
    println!();

    let rendered = toml::to_string_pretty(effective.config)?;
    if rendered.trim().is_empty() {
        println!("{}", color::muted("(no settings in config files)"));
    } else {
        println!("{}", color::bold("Merged config.toml:"));
        print!("{}", rendered);
    }
    Ok(())
}
