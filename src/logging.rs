//! Diagnostic logging on stderr. The report itself is printed by `cli::report`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "intl_analyzer=warn";
const VERBOSE_FILTER: &str = "intl_analyzer=debug";

/// Install the global subscriber. Call once, before anything logs.
///
/// `--verbose` wins over `RUST_LOG`; without either only warnings are shown.
pub fn init_logger(verbose: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
