use tracing_subscriber::EnvFilter;

/// Install a `tracing-subscriber` formatter for binaries and tests.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to the provided
/// level. Returns `false` when a global subscriber was already installed.
pub fn init(log_level: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
