use clap::{Arg, ArgAction, Command};

fn snapshot_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("snapshot-file")
                .long("snapshot-file")
                .short('f')
                .help("Read a static JSON array of cards from this file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .conflicts_with("snapshot"),
        )
        .arg(
            Arg::new("snapshot")
                .long("snapshot")
                .help("Static JSON array of cards, given inline")
                .value_name("JSON"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue),
        )
}

pub fn watch_command() -> Command {
    let command = Command::new("watch")
        .about("Poll an endpoint and re-render the cards on every change")
        .long_about("Fetches the endpoint immediately, then again every base interval. Failed fetches keep the last good cards on screen and double the interval up to the configured maximum. Stop with Ctrl-C.")
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .short('e')
                .help("URL returning {\"items\": [...]} (overrides config)")
                .value_name("URL"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .help("Origin used to resolve a path-only endpoint such as /my/dashboard")
                .value_name("URL"),
        );
    snapshot_args(command)
}

pub fn show_command() -> Command {
    snapshot_args(
        Command::new("show").about("Render a static snapshot once (default: ~/.cardboard/cards.json)"),
    )
}
