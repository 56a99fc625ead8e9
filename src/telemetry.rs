//! Logging initialization.
//!
//! The engine only emits `tracing` events; hosts decide where they go by
//! calling [`init`] once at startup. `SCAFFOLD_LOG` takes precedence over the
//! configured filter.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an env-filter directive
pub const LOG_ENV: &str = "SCAFFOLD_LOG";

/// Build the filter from `SCAFFOLD_LOG`, falling back to `default_filter`.
pub fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a compact stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    tracing_subscriber::registry()
        .with(filter(default_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok()
}
