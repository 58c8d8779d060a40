use clap::{Arg, ArgAction, Command};

pub fn root_command() -> Command {
    Command::new("cardboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Poll a card endpoint and render the cards in your terminal")
        .long_about("cardboard fetches a list of content cards from an HTTP endpoint, keeps the last good list on screen, and retries with exponential backoff when the endpoint misbehaves. A static JSON snapshot can be shown on its own or while the first fetch is pending.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit structured JSON logs on stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}
