//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive, e.g. `TFWARD_LOG=tfward_analysis=debug`.
pub const LOG_ENV_VAR: &str = "TFWARD_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install a global fmt subscriber writing to stderr.
///
/// Safe to call more than once; only the first call installs a subscriber.
/// Returns `true` if this call installed it.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
