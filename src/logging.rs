use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `verbose`; stdout is
/// left to the run report.
pub fn init(verbose: bool) {
    let level = if verbose { "tdsp=debug" } else { "tdsp=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    // Already installed (e.g. by a test harness) is fine.
    let _ = subscriber.try_init();
}
