use cardboard_core::init_logging;

mod app;
pub(crate) mod color;
mod commands;
mod shutdown;
mod table;

fn main() {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Before any output.
    if matches.get_flag("no-color") {
        color::set_no_color();
    }

    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    if let Err(e) = commands::run_command(&matches) {
        // Handlers already printed a user-facing message.
        drop(e);
        std::process::exit(1);
    }
}
