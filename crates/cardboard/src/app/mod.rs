mod cards;
mod global;
mod misc;


use clap::Command;

pub fn build_cli() -> Command {
    global::root_command()
        .subcommand(cards::watch_command())
        .subcommand(cards::show_command())
        .subcommand(misc::config_command())
}
