use tracing_subscriber::EnvFilter;

/// Initializes `tracing` with an `RUST_LOG`-driven filter, defaulting to
/// `info` (`debug` when `-v/--verbose` is set and `RUST_LOG` is unset).
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_env_filter(filter)
        .init();
}
