use clap::ArgMatches;
use tracing::{error, info};

use cardboard_config::SourceConfig;
use cardboard_core::{CardData, parse_snapshot};
use cardboard_paths::{CardboardPaths, PathError};

use super::helpers::{apply_snapshot_overrides, load_config_with_warning, read_snapshot};
use crate::color;
use crate::table::CardTable;

pub(crate) fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    let mut config = load_config_with_warning();
    apply_snapshot_overrides(&mut config.source, matches);

    if let Err(message) = default_snapshot_source(&mut config.source, CardboardPaths::resolve) {
        return Err(report_failure(message));
    }

    info!(
        event = "cli.show_started",
        json_output = json_output,
        snapshot_file = ?config.source.snapshot_file,
        inline = config.source.snapshot.is_some()
    );

    let text = match read_snapshot(&config.source) {
        Ok(Some(text)) => text,
        Ok(None) => return Err(report_failure(NO_SNAPSHOT.to_string())),
        Err(message) => return Err(report_failure(message)),
    };

    let cards = match parse_snapshot(&text) {
        Ok(cards) => cards,
        Err(e) => {
            eprintln!("{}", color::error(&format!("Invalid snapshot: {}", e)));
            eprintln!(
                "{}",
                color::hint("Hint: a snapshot is a JSON array of {\"title\", \"content\"} objects.")
            );
            error!(event = "cli.show_failed", error = %e);
            return Err(e.into());
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print_cards(&cards);
    }

    info!(event = "cli.show_completed", count = cards.len());
    Ok(())
}

const NO_SNAPSHOT: &str = "No snapshot configured. Pass --snapshot or --snapshot-file.";

/// Point `source` at `~/.cardboard/cards.json` when nothing else is set.
fn default_snapshot_source(
    source: &mut SourceConfig,
    resolve_paths: impl FnOnce() -> Result<CardboardPaths, PathError>,
) -> Result<(), String> {
    if source.has_snapshot() {
        return Ok(());
    }
    let paths =
        resolve_paths().map_err(|e| format!("Could not locate default snapshot: {}", e))?;
    source.snapshot_file = Some(paths.default_snapshot());
    Ok(())
}

fn report_failure(message: String) -> Box<dyn std::error::Error> {
    eprintln!("{}", color::error(&message));
    error!(event = "cli.show_failed", error = %message);
    message.into()
}

pub(crate) fn print_cards(cards: &[CardData]) {
    if cards.is_empty() {
        println!("{}", color::muted("No cards."));
        return;
    }
    print!("{}", CardTable::new(cards).render(cards));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_snapshot_source_reports_missing_home() {
        let mut source = SourceConfig::default();
        let message =
            default_snapshot_source(&mut source, || Err(PathError::HomeNotFound)).unwrap_err();
        assert!(message.starts_with("Could not locate default snapshot: "));
        assert!(message.contains("home directory not found"));
        assert_eq!(source.snapshot_file, None);
    }

    #[test]
    fn test_default_snapshot_source_uses_home_snapshot() {
        let mut source = SourceConfig::default();
        let paths = CardboardPaths::from_dir(PathBuf::from("/tmp/home/.cardboard"));
        let expected = paths.default_snapshot();
        default_snapshot_source(&mut source, move || Ok(paths)).unwrap();
        assert_eq!(source.snapshot_file, Some(expected));
    }

    #[test]
    fn test_default_snapshot_source_keeps_configured_snapshot() {
        let mut source = SourceConfig {
            snapshot: Some("[]".to_string()),
            ..Default::default()
        };
        default_snapshot_source(&mut source, || Err(PathError::HomeNotFound)).unwrap();
        assert_eq!(source.snapshot_file, None);
    }

    #[test]
    fn test_report_failure_keeps_message() {
        let err = report_failure(NO_SNAPSHOT.to_string());
        assert_eq!(err.to_string(), NO_SNAPSHOT);
    }
}
