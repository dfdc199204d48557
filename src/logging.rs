use tracing_subscriber::{fmt, EnvFilter};

/// Initialize stderr logging.
///
/// `RUST_LOG` takes precedence. Otherwise `verbose` turns on debug output for
/// this crate and everything else stays at `warn`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "warn,f1_predictor=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
