use std::io::IsTerminal;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use clap::ArgMatches;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use cardboard_core::{
    CardData, CardboardError, HttpFetcher, PollConfig, PollController, PollError, PollFailure,
    PollStatus, TracingDiagnostics, duration_millis,
};

use super::helpers::{
    apply_endpoint_overrides, apply_snapshot_overrides, load_config_with_warning, read_snapshot,
};
use super::show::print_cards;
use crate::color;
use crate::shutdown;

/// One line of `watch --json` output.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WatchEvent<'a> {
    Cards {
        at: DateTime<Utc>,
        cards: &'a [CardData],
    },
    Failure {
        at: DateTime<Utc>,
        event: &'static str,
        failure: &'a PollFailure,
        consecutive_failures: u32,
        retry_in_ms: u64,
    },
    Recovered {
        at: DateTime<Utc>,
    },
}

/// Which status transitions are worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusChange {
    None,
    Failed,
    Recovered,
}

fn classify(previous_failures: u32, status: &PollStatus) -> StatusChange {
    if status.consecutive_failures > previous_failures && status.last_failure.is_some() {
        StatusChange::Failed
    } else if status.consecutive_failures == 0 && previous_failures > 0 {
        StatusChange::Recovered
    } else {
        StatusChange::None
    }
}

pub(crate) fn handle_watch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    let mut config = load_config_with_warning();
    apply_endpoint_overrides(&mut config.source, matches);
    apply_snapshot_overrides(&mut config.source, matches);

    if let Err(e) = config.validate() {
        eprintln!("{}", color::error(&format!("Invalid configuration: {}", e)));
        error!(event = "cli.watch_failed", error = %e, code = e.error_code());
        return Err(e.into());
    }

    let snapshot = match read_snapshot(&config.source) {
        Ok(snapshot) => snapshot,
        Err(message) => {
            eprintln!("{}", color::error(&message));
            error!(event = "cli.watch_failed", error = %message);
            return Err(message.into());
        }
    };
    let endpoint = config.source.resolved_endpoint();

    if endpoint.is_none() && snapshot.is_none() {
        eprintln!("{}", color::error("Nothing to watch: no endpoint or snapshot configured."));
        eprintln!(
            "{}",
            color::hint("Hint: pass --endpoint URL or set [source] endpoint in ~/.cardboard/config.toml.")
        );
        return Err("No source configured".into());
    }

    let mut poll_config = PollConfig::from_settings(&config.poll);
    poll_config.endpoint = endpoint;
    poll_config.snapshot = snapshot;

    let fetcher = match HttpFetcher::new(config.poll.request_timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            let e = PollError::from(e);
            eprintln!("{}", color::error(&e.to_string()));
            error!(event = "cli.watch_failed", error = %e, code = e.error_code());
            return Err(e.into());
        }
    };

    info!(
        event = "cli.watch_started",
        endpoint = poll_config.endpoint.as_deref().unwrap_or("-"),
        has_snapshot = poll_config.snapshot.is_some(),
        json_output = json_output
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_watch(poll_config, fetcher, json_output))
}

async fn run_watch(
    poll_config: PollConfig,
    fetcher: HttpFetcher,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = match PollController::activate(
        poll_config,
        Arc::new(fetcher),
        Arc::new(TracingDiagnostics),
    ) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("{}", color::error(&format!("Failed to start watching: {}", e)));
            error!(
                event = "cli.watch_failed",
                error = %e,
                code = e.error_code(),
                user_error = e.is_user_error()
            );
            return Err(e.into());
        }
    };

    let token = CancellationToken::new();
    tokio::spawn(shutdown::wait_for_shutdown_signal(token.clone()));

    let mut cards = controller.subscribe_cards();
    let mut status = controller.subscribe_status();
    let mut reported_failures = 0u32;

    let initial = cards.borrow_and_update().clone();
    render_cards(&initial, json_output)?;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            changed = cards.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = cards.borrow_and_update().clone();
                render_cards(&current, json_output)?;
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                match classify(reported_failures, &current) {
                    StatusChange::Failed => render_failure(&current, json_output)?,
                    StatusChange::Recovered => render_recovered(json_output)?,
                    StatusChange::None => {}
                }
                reported_failures = current.consecutive_failures;
                if !current.active {
                    warn!(event = "cli.watch.controller_stopped");
                    break;
                }
            }
        }
    }

    controller.deactivate().await;
    token.cancel();

    let final_status = controller.status();
    info!(
        event = "cli.watch_completed",
        cycles = final_status.cycles,
        cards = controller.cards().len()
    );
    Ok(())
}

fn render_cards(cards: &[CardData], json_output: bool) -> Result<(), serde_json::Error> {
    if json_output {
        let event = WatchEvent::Cards {
            at: Utc::now(),
            cards,
        };
        println!("{}", serde_json::to_string(&event)?);
        return Ok(());
    }

    if std::io::stdout().is_terminal() {
        // Clear screen, cursor home.
        print!("\x1b[2J\x1b[H");
    }
    println!(
        "{} {}",
        color::bold(&format!("{} card(s)", cards.len())),
        color::muted(&format!("updated {}", Local::now().format("%H:%M:%S")))
    );
    print_cards(cards);
    Ok(())
}

fn render_failure(status: &PollStatus, json_output: bool) -> Result<(), serde_json::Error> {
    let Some(failure) = &status.last_failure else {
        return Ok(());
    };
    let retry_in_ms = duration_millis(status.interval);

    if json_output {
        let event = WatchEvent::Failure {
            at: Utc::now(),
            event: failure.event_name(),
            failure,
            consecutive_failures: status.consecutive_failures,
            retry_in_ms,
        };
        println!("{}", serde_json::to_string(&event)?);
    } else {
        eprintln!(
            "{} {}",
            color::warning(&failure.to_string()),
            color::hint(&format!(
                "(attempt {}, retrying in {:.1}s; showing last good cards)",
                status.consecutive_failures,
                status.interval.as_secs_f64()
            ))
        );
    }
    Ok(())
}

fn render_recovered(json_output: bool) -> Result<(), serde_json::Error> {
    if json_output {
        println!(
            "{}",
            serde_json::to_string(&WatchEvent::Recovered { at: Utc::now() })?
        );
    } else {
        eprintln!("{}", color::fresh("Endpoint recovered."));
    }
    Ok(())
}
