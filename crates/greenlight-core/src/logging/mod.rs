use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted.
/// When `quiet` is false, info-level and above events are emitted (default).
/// Events go to stderr as JSON so stdout stays clean for tables and `--json`.
pub fn init_logging(quiet: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env().add_directive(
                default_directive(quiet)
                    .parse()
                    .expect("Invalid log directive"),
            ),
        )
        .init();
}

/// Directive applied on top of `RUST_LOG`. Covers both `greenlight` and
/// `greenlight_core` targets since filter targets match by prefix.
fn default_directive(quiet: bool) -> &'static str {
    if quiet {
        "greenlight=error"
    } else {
        "greenlight=info"
    }
}
