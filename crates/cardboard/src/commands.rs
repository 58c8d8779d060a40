use clap::ArgMatches;
use tracing::{error, info};

mod config;
mod helpers;
mod show;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        event = "cli.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );

    match matches.subcommand() {
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("show", sub_matches)) => show::handle_show_command(sub_matches),
        Some(("config", sub_matches)) => config::handle_config_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
