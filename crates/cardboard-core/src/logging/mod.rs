use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted.
/// When `quiet` is false, info-level and above events are emitted.
/// `RUST_LOG` directives are honored on top of either level.
pub fn init_logging(quiet: bool) {
    let directive = if quiet {
        "cardboard=error"
    } else {
        "cardboard=info"
    };

    let filter = match directive.parse() {
        Ok(parsed) => EnvFilter::from_default_env().add_directive(parsed),
        Err(_) => EnvFilter::from_default_env(),
    };

    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .try_init();
}
