use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,masal=debug";

/// `RUST_LOG`, or the default filter; `verbose` forces debug for every target.
pub(crate) fn console_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize console logging.
pub fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(console_filter(verbose))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
